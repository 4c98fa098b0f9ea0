use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    time::Duration,
};

#[derive(clap::Parser)]
#[command(version, about = "Generates registry tags for Sushi LP tokens")]
pub struct Arguments {
    /// Decimal id of the chain whose pools get tagged.
    #[clap(long, env)]
    pub chain_id: String,

    /// The Graph gateway API key used in the subgraph endpoint.
    #[clap(long, env = "THEGRAPH_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// TOML file with the supported chains and their endpoint templates.
    /// Defaults to the table built into the binary.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Overrides the per-request timeout of the chain table.
    #[clap(long, env, value_parser = humantime::parse_duration)]
    pub request_timeout: Option<Duration>,

    #[clap(long, env, default_value = "warn,contract_tags=info")]
    pub log_filter: String,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            chain_id,
            api_key: _,
            config,
            request_timeout,
            log_filter,
        } = self;

        writeln!(f, "chain_id: {chain_id}")?;
        writeln!(f, "api_key: SECRET")?;
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "request_timeout: {request_timeout:?}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        Ok(())
    }
}
