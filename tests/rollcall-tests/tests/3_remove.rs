use anyhow::Result;
use rollcall::message::Change;
use rollcall::process::RoleKind;
use rollcall_tests::*;
use serial_test::serial;

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn dead_follower_is_removed() -> Result<()> {
    let mut cluster = Cluster::new(3).await?;
    cluster.kill(2);
    cluster.wait_for_members(&[0, 1]).await?;
    assert_eq!(cluster.status(0).view.view_id(), 1);
    assert_eq!(cluster.status(1).leader, cluster.address(0));
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn delete_through_a_follower() -> Result<()> {
    let cluster = Cluster::new(4).await?;
    cluster.submit(1, Change::Delete(cluster.address(3))).await?;
    cluster.wait_for_members(&[0, 1, 2]).await?;
    for id in 0..3 {
        assert_eq!(cluster.status(id).view.view_id(), 1);
    }

    // The removed node stays up but never takes over.
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let removed = cluster.status(3);
    assert_eq!(removed.view, cluster.status(0).view);
    assert_eq!(removed.role, RoleKind::Follower);
    for id in 0..3 {
        let status = cluster.status(id);
        assert_eq!(status.view.view_id(), 1);
        assert_eq!(status.leader, cluster.address(0));
    }
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn leader_cannot_be_deleted() -> Result<()> {
    let cluster = Cluster::new(3).await?;
    cluster.submit(2, Change::Delete(cluster.address(0))).await?;
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    for id in 0..3 {
        let status = cluster.status(id);
        assert_eq!(status.view.view_id(), 0);
        assert_eq!(status.leader, cluster.address(0));
    }
    Ok(())
}
