/// The networks the orderbook API serves orders for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
#[repr(u64)]
pub enum Network {
    Mainnet = 1,
    #[value(name = "xdai")]
    Gnosis = 100,
    ArbitrumOne = 42161,
    Base = 8453,
    Sepolia = 11155111,
}

impl Network {
    /// Returns the network's chain ID
    pub fn chain_id(&self) -> u64 {
        *self as u64
    }

    /// The path segment that selects the network in the orderbook API.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Gnosis => "xdai",
            Self::ArbitrumOne => "arbitrum_one",
            Self::Base => "base",
            Self::Sepolia => "sepolia",
        }
    }

    /// Returns the canonical name of the network on CoW Protocol.
    pub fn name(&self) -> &'static str {
        // You can find a list of available networks by network and chain id here:
        // https://chainid.network/chains.json
        match self {
            Self::Mainnet => "Ethereum / Mainnet",
            Self::Gnosis => "xDAI",
            Self::ArbitrumOne => "Arbitrum One",
            Self::Base => "Base",
            Self::Sepolia => "Ethereum / Sepolia",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}
