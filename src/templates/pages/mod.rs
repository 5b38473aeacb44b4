pub mod buyer;

pub use buyer::buyer_page;
