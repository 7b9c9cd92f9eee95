pub mod http_client;
pub mod registry;
pub mod url_parser;
pub mod ytdlp;
