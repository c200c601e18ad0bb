#![allow(unused_imports)]

pub use dagsync_test_utils::builders;
pub use dagsync_test_utils::recorder;
pub use dagsync_test_utils::{init_tracing, with_timeout, within};
