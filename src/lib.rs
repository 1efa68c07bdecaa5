#![allow(async_fn_in_trait)]
#![allow(dead_code)]
pub mod asf;
pub mod error;
pub mod fetch;
pub mod netrc;
pub mod search_results;
