mod price;
mod provider;
mod region;
mod service;
mod sku;
mod term;

pub use price::Price;
pub use provider::Provider;
pub use region::Region;
pub use service::Service;
pub use sku::Sku;
pub use term::Term;
