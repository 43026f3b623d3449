use anyhow::Result;
use rollcall::process::{RoleKind, SyncState};
use rollcall_tests::*;
use serial_test::serial;
use std::time::Duration;

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn first_host_leads_view_0() -> Result<()> {
    let cluster = Cluster::new(3).await?;
    for id in 0..3 {
        let status = cluster.status(id);
        assert_eq!(status.view.view_id(), 0);
        assert_eq!(status.view.members(), &cluster.addresses(&[0, 1, 2]));
        assert_eq!(status.leader, cluster.address(0));
        assert!(!status.just_joined);
    }
    assert_eq!(cluster.status(0).role, RoleKind::Leader);
    assert_eq!(cluster.status(1).role, RoleKind::Follower);
    assert_eq!(cluster.status(2).role, RoleKind::Follower);
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn heartbeats_keep_everyone_in() -> Result<()> {
    let cluster = Cluster::new(3).await?;
    // Several suspicion timeouts pass.
    tokio::time::sleep(Duration::from_secs(3)).await;
    for id in 0..3 {
        let status = cluster.status(id);
        assert_eq!(status.view.view_id(), 0);
        assert_eq!(status.leader, cluster.address(0));
        assert_eq!(status.sync, SyncState::Synced);
    }
    Ok(())
}
