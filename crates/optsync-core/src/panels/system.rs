use crate::models::{FieldCheck, FieldSpec, ListOrder, PanelSchema};

/// Ports allowed for outbound fetches when the server has none stored.
const DEFAULT_ALLOWED_PORTS: [&str; 4] = ["80", "443", "8080", "8443"];

/// Login, OAuth providers, mail, workers and SSRF protection.
pub fn schema() -> PanelSchema {
    PanelSchema::builtin(
        "system",
        vec![
            FieldSpec::toggle("PasswordLoginEnabled").with_default(true),
            FieldSpec::toggle("PasswordRegisterEnabled").with_default(true),
            FieldSpec::toggle("EmailVerificationEnabled"),
            FieldSpec::toggle("RegisterEnabled").with_default(true),
            FieldSpec::text("ServerAddress").url(),
            FieldSpec::text("Notice"),
            FieldSpec::text("Footer"),
            // Image worker
            FieldSpec::text("WorkerUrl").url(),
            FieldSpec::text("WorkerValidKey").secret(),
            FieldSpec::toggle("WorkerAllowHttpImageRequestEnabled"),
            // GitHub
            FieldSpec::toggle("GitHubOAuthEnabled"),
            FieldSpec::text("GitHubClientId"),
            FieldSpec::text("GitHubClientSecret").secret(),
            // OIDC
            FieldSpec::toggle("oidc.enabled"),
            FieldSpec::text("oidc.client_id"),
            FieldSpec::text("oidc.client_secret").secret(),
            FieldSpec::text("oidc.well_known").skip_empty(),
            FieldSpec::text("oidc.authorization_endpoint"),
            FieldSpec::text("oidc.token_endpoint"),
            FieldSpec::text("oidc.user_info_endpoint"),
            // LinuxDO
            FieldSpec::toggle("LinuxDOOAuthEnabled"),
            FieldSpec::text("LinuxDOClientId"),
            FieldSpec::text("LinuxDOClientSecret").secret(),
            FieldSpec::integer("LinuxDOMinimumTrustLevel", 0).with_bounds(0, 4),
            // Telegram
            FieldSpec::toggle("TelegramOAuthEnabled"),
            FieldSpec::text("TelegramBotToken").secret(),
            FieldSpec::text("TelegramBotName"),
            // WeChat
            FieldSpec::toggle("WeChatAuthEnabled"),
            FieldSpec::text("WeChatServerAddress").url(),
            FieldSpec::text("WeChatServerToken").secret(),
            FieldSpec::text("WeChatAccountQRCodeImageURL"),
            // Turnstile
            FieldSpec::toggle("TurnstileCheckEnabled"),
            FieldSpec::text("TurnstileSiteKey"),
            FieldSpec::text("TurnstileSecretKey").secret(),
            // Passkey
            FieldSpec::toggle("passkey.enabled"),
            FieldSpec::text("passkey.rp_display_name"),
            FieldSpec::text("passkey.rp_id"),
            FieldSpec::text("passkey.origins"),
            FieldSpec::toggle("passkey.allow_insecure_origin"),
            FieldSpec::text("passkey.user_verification").with_default("preferred"),
            FieldSpec::text("passkey.attachment_preference"),
            // SMTP
            FieldSpec::text("SMTPServer"),
            FieldSpec::text("SMTPPort").skip_empty(),
            FieldSpec::text("SMTPAccount"),
            FieldSpec::text("SMTPFrom"),
            FieldSpec::text("SMTPToken").secret(),
            FieldSpec::toggle("SMTPSSLEnabled"),
            // Email restrictions
            FieldSpec::toggle("EmailDomainRestrictionEnabled"),
            FieldSpec::toggle("EmailAliasRestrictionEnabled"),
            FieldSpec::comma_list("EmailDomainWhitelist", ListOrder::Significant)
                .with_check(FieldCheck::DomainNames),
            // SSRF protection
            FieldSpec::toggle("fetch_setting.enable_ssrf_protection").with_default(true),
            FieldSpec::toggle("fetch_setting.allow_private_ip"),
            FieldSpec::toggle("fetch_setting.domain_filter_mode"),
            FieldSpec::string_list("fetch_setting.domain_list", ListOrder::Significant),
            FieldSpec::toggle("fetch_setting.ip_filter_mode"),
            FieldSpec::string_list("fetch_setting.ip_list", ListOrder::Significant),
            FieldSpec::string_list("fetch_setting.allowed_ports", ListOrder::Ignored).with_default(
                DEFAULT_ALLOWED_PORTS
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            ),
            FieldSpec::toggle("fetch_setting.apply_ip_filter_for_domain"),
        ],
    )
}
