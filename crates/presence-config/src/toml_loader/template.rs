//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Presence client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "localhost:8099"
# path_prefix = "/ws/presence"
# secure = false               # true selects wss://
# connect_timeout_secs = 15    # 1-120
# keepalive_interval_secs = 25 # 0-300, 0 disables pings

[reconnect]
# enabled = true
# initial_delay_ms = 500       # 10-60000
# max_delay_ms = 30000         # >= initial_delay_ms, <= 600000
# max_attempts = 6             # 1-100
# jitter = 0.3                 # 0.0-1.0

[roster]
# join_policy = "upsert"       # "upsert" or "append"

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
}
