use super::helpers::SectionCheck;
use crate::schema::PresenceConfig;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &PresenceConfig) {
    let server = &config.server;
    let mut check = SectionCheck::new("server", errors);

    check.ensure(!server.host.trim().is_empty(), "host", "must not be empty");
    check.ensure(
        !server.host.contains("://"),
        "host",
        format_args!(
            "= {:?} must not include a scheme; use server.secure",
            server.host
        ),
    );
    check.ensure(
        server.path_prefix.starts_with('/'),
        "path_prefix",
        format_args!("= {:?} must start with '/'", server.path_prefix),
    );

    check.within("connect_timeout_secs", server.connect_timeout_secs, 1..=120);
    check.within("keepalive_interval_secs", server.keepalive_interval_secs, 0..=300);
}
