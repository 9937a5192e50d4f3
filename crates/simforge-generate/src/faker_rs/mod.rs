pub mod adapter;
pub mod locales;

pub use adapter::ContactFaker;
pub use locales::LocaleKey;
