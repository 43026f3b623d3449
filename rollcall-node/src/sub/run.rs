use super::*;

use rollcall::{Config, MembershipNode, Timing};

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Control port. Heartbeats use the port right above it.
    #[clap(short, long, default_value_t = 10000)]
    port: u16,
    /// Seconds to sleep before startup.
    #[clap(long, default_value_t = 0)]
    pause: u64,
    /// Bootstrap host list, one host per line. The first one leads.
    #[clap(long, default_value = "hostfile")]
    hostfile: String,
    /// Name other processes know this one by.
    #[clap(long, env = "HOSTNAME")]
    name: String,
    #[clap(long, default_value_t = 1000)]
    heartbeat_interval_ms: u64,
    #[clap(long, default_value_t = 3000)]
    liveness_check_interval_ms: u64,
    #[clap(long, default_value_t = 3000)]
    suspect_timeout_ms: u64,
}

fn parse_hostfile(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|x| !x.is_empty() && !x.starts_with('#'))
        .collect()
}

pub async fn run(args: CommandArgs) -> Result<()> {
    if args.pause > 0 {
        info!("pause for {}s", args.pause);
        tokio::time::sleep(Duration::from_secs(args.pause)).await;
    }

    let contents = tokio::fs::read_to_string(&args.hostfile)
        .await
        .with_context(|| format!("failed to read the host list at {}", args.hostfile))?;
    let mut hosts = vec![];
    for host in parse_hostfile(&contents) {
        hosts.push(resolve(host, args.port).await?);
    }
    let id = resolve(&args.name, args.port).await?;
    info!("{} is {id}. hosts={hosts:?}", args.name);

    let config = Config::new(id, hosts)?.listen_on([0, 0, 0, 0].into());
    let timing = Timing {
        heartbeat_interval: Duration::from_millis(args.heartbeat_interval_ms),
        liveness_check_interval: Duration::from_millis(args.liveness_check_interval_ms),
        suspect_timeout: Duration::from_millis(args.suspect_timeout_ms),
    };
    let node = MembershipNode::start(config, timing).await?;

    let mut status = node.subscribe();
    let mut last = status.borrow().clone();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let cur = status.borrow_and_update().clone();
                if cur.view != last.view || cur.leader != last.leader {
                    info!(
                        "view {} members={:?} leader={} role={}",
                        cur.view.view_id(),
                        cur.view.members(),
                        cur.leader,
                        cur.role,
                    );
                }
                last = cur;
            }
        }
    }
    Ok(())
}
