use super::helpers::SectionCheck;
use crate::schema::PresenceConfig;

pub(crate) fn validate_reconnect(errors: &mut Vec<String>, config: &PresenceConfig) {
    let reconnect = &config.reconnect;
    let mut check = SectionCheck::new("reconnect", errors);

    check.within("initial_delay_ms", reconnect.initial_delay_ms, 10..=60_000);
    // The cap may never undercut the first delay.
    check.within(
        "max_delay_ms",
        reconnect.max_delay_ms,
        reconnect.initial_delay_ms..=600_000,
    );
    check.within("max_attempts", reconnect.max_attempts, 1..=100);
    check.within("jitter", reconnect.jitter, 0.0..=1.0);
}
