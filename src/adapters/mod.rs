// Adapters layer: concrete collaborators for policy stores, network state and location backends.

pub mod network;
pub mod policy;
pub mod provider;

pub use network::SystemNetworkProbe;
pub use policy::{EnvPolicyReader, StaticPolicyReader};
pub use provider::{platform_provider, StaticProvider, UnavailableProvider};
