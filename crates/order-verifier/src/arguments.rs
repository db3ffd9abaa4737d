use {
    crate::network::Network,
    model::order::OrderUid,
    std::{
        fmt::{self, Display, Formatter},
        num::NonZeroUsize,
        time::Duration,
    },
    url::Url,
};

/// A fulfilled mainnet order, verified when no UIDs are given.
pub const SAMPLE_ORDER_UID: &str = "0x502b1cc8d3da63b55762fa028a5c6ecf0818c765484525fcfe2b63103b173e758352b830b2d719aa370cb04a1830c14cf32e3f1a67655feb";

/// Recomputes the UIDs of CoW Protocol orders from their data and checks
/// their app data against its hash.
#[derive(clap::Parser)]
#[clap(name = "order-verifier")]
pub struct Arguments {
    /// UIDs of the orders to verify, `0x` prefixed hex.
    #[clap(env = "ORDER_UIDS", value_delimiter = ',')]
    pub uids: Vec<OrderUid>,

    /// The network the orders were placed on.
    #[clap(long, env, value_enum, default_value = "mainnet")]
    pub network: Network,

    /// Base URL of the orderbook API. The network name is appended to it.
    #[clap(long, env, default_value = "https://api.cow.fi")]
    pub api_base_url: Url,

    /// Timeout for requests to the orderbook API.
    #[clap(
        long,
        env,
        default_value = "10s",
        value_parser = humantime::parse_duration,
    )]
    pub http_timeout: Duration,

    /// Maximum number of orders that are fetched at the same time.
    #[clap(long, env, default_value = "4")]
    pub concurrency: NonZeroUsize,

    /// Look up the app data document by its hash if the order response does
    /// not include it.
    #[clap(long, env, default_value = "false")]
    pub resolve_app_data: bool,

    /// Print one JSON report per order to stdout. Combine with
    /// `--log-stderr-threshold trace` to keep the logs out of stdout.
    #[clap(long, env, default_value = "false")]
    pub json: bool,

    #[clap(long, env, default_value = "warn,order_verifier=info")]
    pub log_filter: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env)]
    pub log_stderr_threshold: Option<tracing::Level>,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            uids,
            network,
            api_base_url,
            http_timeout,
            concurrency,
            resolve_app_data,
            json,
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "uids: {uids:?}")?;
        writeln!(f, "network: {network} ({})", network.name())?;
        writeln!(f, "api_base_url: {api_base_url}")?;
        writeln!(f, "http_timeout: {http_timeout:?}")?;
        writeln!(f, "concurrency: {concurrency}")?;
        writeln!(f, "resolve_app_data: {resolve_app_data}")?;
        writeln!(f, "json: {json}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold:?}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}
