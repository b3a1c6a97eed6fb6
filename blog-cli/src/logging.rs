use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// HTTP-стек внешнего API шумит на `debug`, его уровень не поднимается вместе с нашим.
const QUIET_DEPENDENCIES: &str = "hyper_util=warn,reqwest=warn";

/// Логи пишутся в stderr, чтобы не смешиваться с выводом команд (в том числе `--json`).
pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{level},{QUIET_DEPENDENCIES}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_DEPENDENCIES}")))
}

#[cfg(test)]
mod tests {
    use super::default_filter;

    #[test]
    fn default_filter_keeps_level_and_quiets_http_stack() {
        let directives = default_filter("debug").to_string();
        assert!(directives.contains("debug"), "{directives}");
        assert!(directives.contains("hyper_util=warn"), "{directives}");
        assert!(directives.contains("reqwest=warn"), "{directives}");
    }
}
