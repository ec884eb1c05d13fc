pub mod observers;
pub use observers::{ObserverCallback, ObserverRegistry, Subscription};
