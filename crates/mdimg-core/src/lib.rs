pub mod config;
pub mod logging;

pub mod fetch;
pub mod links;
pub mod rewriter;
pub mod run;
pub mod scanner;
pub mod url_model;
