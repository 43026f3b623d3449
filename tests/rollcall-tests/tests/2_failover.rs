use anyhow::Result;
use rollcall::process::{RoleKind, SyncState};
use rollcall_tests::*;
use serial_test::serial;

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn next_host_takes_over() -> Result<()> {
    let mut cluster = Cluster::new(3).await?;
    cluster.kill(0);

    let new_leader = cluster.address(1);
    for id in [1, 2] {
        cluster
            .wait_for(id, |x| x.leader == new_leader && x.sync == SyncState::Synced)
            .await?;
    }
    cluster.wait_for_members(&[1, 2]).await?;
    assert_eq!(cluster.status(1).role, RoleKind::Leader);
    assert_eq!(cluster.status(2).role, RoleKind::Follower);
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn new_leader_admits_joiners() -> Result<()> {
    let mut cluster = Cluster::new(3).await?;
    cluster.kill(0);
    cluster.wait_for_members(&[1, 2]).await?;

    cluster.join(3).await?;
    cluster.wait_for_members(&[1, 2, 3]).await?;
    assert_eq!(cluster.status(3).leader, cluster.address(1));
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn second_failover() -> Result<()> {
    let mut cluster = Cluster::new(4).await?;
    cluster.kill(0);
    cluster.wait_for_members(&[1, 2, 3]).await?;
    cluster.kill(1);
    cluster.wait_for_members(&[2, 3]).await?;
    assert_eq!(cluster.status(3).leader, cluster.address(2));
    Ok(())
}
