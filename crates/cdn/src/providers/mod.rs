//! Wire-protocol clients, one module per provider family.

pub mod azure;
pub mod cloudflare;
pub mod cloudfront;
pub mod fastly;
pub mod firewall;
