use anyhow::Result;
use rollcall::message::Change;
use rollcall_tests::*;
use serial_test::serial;

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn outsider_joins() -> Result<()> {
    let mut cluster = Cluster::new(3).await?;
    cluster.join(3).await?;
    assert!(cluster.status(3).just_joined);

    cluster.wait_for_members(&[0, 1, 2, 3]).await?;
    for id in 0..4 {
        let status = cluster.status(id);
        assert_eq!(status.view.view_id(), 1);
        assert_eq!(status.leader, cluster.address(0));
    }
    assert!(!cluster.status(3).just_joined);
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn two_outsiders_join_one_at_a_time() -> Result<()> {
    let mut cluster = Cluster::new(2).await?;
    cluster.join(2).await?;
    cluster.join(3).await?;

    cluster.wait_for_members(&[0, 1, 2, 3]).await?;
    assert_eq!(cluster.status(0).view.view_id(), 2);
    Ok(())
}

#[serial]
#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn repeated_add_is_committed_once() -> Result<()> {
    let mut cluster = Cluster::new(3).await?;
    cluster.join(3).await?;
    cluster.wait_for_members(&[0, 1, 2, 3]).await?;

    cluster.submit(1, Change::Add(cluster.address(3))).await?;
    cluster.submit(0, Change::Add(cluster.address(3))).await?;
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    for id in 0..4 {
        assert_eq!(cluster.status(id).view.view_id(), 1);
    }
    Ok(())
}
