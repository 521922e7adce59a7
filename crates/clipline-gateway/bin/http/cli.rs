use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "CLIPLINE_GATEWAY_LISTEN_ADDR";
pub const CACHE_BACKEND_ENV: &str = "CLIPLINE_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "CLIPLINE_REDIS_URL";
pub const CRAWLER_URL_ENV: &str = "CLIPLINE_CRAWLER_URL";
pub const DISCUSSIONS_URL_ENV: &str = "CLIPLINE_DISCUSSIONS_URL";
pub const MAIL_URL_ENV: &str = "CLIPLINE_MAIL_URL";
pub const CRAWL_TIMEOUT_ENV: &str = "CLIPLINE_CRAWL_TIMEOUT_SECS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CRAWLER_URL: &str = "http://127.0.0.1:9090";
pub const DEFAULT_DISCUSSIONS_URL: &str = "http://127.0.0.1:9091";
pub const DEFAULT_MAIL_URL: &str = "http://127.0.0.1:9092";
pub const DEFAULT_CRAWL_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "clipline-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = CRAWLER_URL_ENV, default_value = DEFAULT_CRAWLER_URL)]
    pub crawler_url: String,

    #[arg(long, env = DISCUSSIONS_URL_ENV, default_value = DEFAULT_DISCUSSIONS_URL)]
    pub discussions_url: String,

    #[arg(long, env = MAIL_URL_ENV, default_value = DEFAULT_MAIL_URL)]
    pub mail_url: String,

    #[arg(long, env = CRAWL_TIMEOUT_ENV, default_value_t = DEFAULT_CRAWL_TIMEOUT_SECS)]
    pub crawl_timeout_secs: u64,
}
