pub mod logger;
pub mod param_parser;
