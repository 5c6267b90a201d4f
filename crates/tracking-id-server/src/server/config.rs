use anyhow::{Context, bail};
use chrono::Utc;
use clap::Parser;
use core::{num::NonZeroU32, time::Duration};
use std::net::SocketAddr;
use tracking_id::{DEFAULT_MAX_ATTEMPTS, EPOCH, TrackingId};

/// Runtime configuration for the `tracking-id-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first when present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tracking-id-server",
    version,
    about = "An HTTP service that issues unique, persisted shipment tracking numbers"
)]
pub struct CliArgs {
    /// Worker ID embedded in every generated tracking number.
    ///
    /// Every process issuing numbers into the same store must use a distinct
    /// value between 0 and 1023.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Custom epoch, in milliseconds since 1970-01-01T00:00:00Z.
    ///
    /// All processes sharing a store must agree on it. Defaults to
    /// 2020-01-01T00:00:00Z.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Attempts made to persist a unique tracking number before giving up.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS.get())]
    pub max_attempts: u32,

    /// Deadline for a single generation request, in milliseconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_MS`
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 5_000)]
    pub request_timeout_ms: u64,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub worker_id: u64,
    pub epoch: Duration,
    pub max_attempts: NonZeroU32,
    pub request_timeout: Duration,
    pub server_addr: SocketAddr,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_worker_id = TrackingId::max_worker_id();
        if args.worker_id > max_worker_id {
            bail!(
                "WORKER_ID ({}) exceeds the worker ID space (max = {})",
                args.worker_id,
                max_worker_id
            );
        }

        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        if args.epoch_ms > now_ms {
            bail!("EPOCH_MS ({}) is in the future", args.epoch_ms);
        }

        let Some(max_attempts) = NonZeroU32::new(args.max_attempts) else {
            bail!("MAX_ATTEMPTS must be greater than 0");
        };

        if args.request_timeout_ms == 0 {
            bail!("REQUEST_TIMEOUT_MS must be greater than 0");
        }

        let server_addr = args
            .server_addr
            .parse()
            .with_context(|| format!("invalid SERVER_ADDR `{}`", args.server_addr))?;

        Ok(Self {
            worker_id: args.worker_id,
            epoch: Duration::from_millis(args.epoch_ms),
            max_attempts,
            request_timeout: Duration::from_millis(args.request_timeout_ms),
            server_addr,
        })
    }
}
