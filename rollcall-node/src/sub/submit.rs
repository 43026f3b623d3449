use super::*;

use rollcall::message::Change;

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Process to send the request to. Any member will do.
    #[clap(long)]
    to: String,
    /// Member to add.
    #[clap(long, conflicts_with = "delete")]
    add: Option<String>,
    /// Member to remove.
    #[clap(long)]
    delete: Option<String>,
    /// Port of hosts given without one.
    #[clap(short, long, default_value_t = 10000)]
    port: u16,
}

pub async fn run(args: CommandArgs) -> Result<()> {
    let to = resolve(&args.to, args.port).await?;
    let change = match (args.add, args.delete) {
        (Some(x), None) => Change::Add(resolve(&x, args.port).await?),
        (None, Some(x)) => Change::Delete(resolve(&x, args.port).await?),
        _ => anyhow::bail!("give either --add or --delete"),
    };
    rollcall::transport::submit(to, change).await
}
