//! Node against peers served from local directories.

use std::path::Path;
use std::time::Duration;
use stepchain_node::{Command, Node, NodeConfig, Report, ResolveReport};
use tempfile::TempDir;

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

struct Network {
    dir: TempDir,
}

impl Network {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }

    /// Peer line for the node directory `peer`.
    fn peer(&self, peer: &str) -> String {
        format!("peer,{}\n", self.path(peer).join("pay.csv").display())
    }

    fn config(&self) -> NodeConfig {
        NodeConfig {
            data_dir: self.path("data"),
            seed_dir: self.path("seeds"),
            series: "pay.csv".to_string(),
            step: 100,
            fetch_timeout: Duration::from_secs(2),
            ..NodeConfig::default()
        }
    }
}

fn step_one(net: &Network) -> String {
    format!(
        "Format,pluribusunum\n{}{}_begincoins\nA,B,C\nD,=\n_endcoins\n",
        net.peer("p1"),
        net.peer("p2")
    )
}

#[tokio::test]
async fn rebuilds_from_local_peers() {
    let net = Network::new();
    let base = format!(
        "Format,pluribusunum\n{}{}{}",
        net.peer("p1"),
        net.peer("p2"),
        net.peer("p3")
    );
    write(&net.path("seeds/pay_0.csv"), &base);

    let agreed = step_one(&net);
    write(&net.path("p1/pay_1.csv"), &agreed);
    // Same content, different whitespace.
    write(&net.path("p2/pay_1.csv"), &format!("\n  {}\n", agreed.replace('\n', "  \n")));
    write(&net.path("p3/pay_1.csv"), "Format,pluribusunum\nsomething else\n");

    let node = Node::new(net.config()).unwrap();

    match node.resolve(150).await {
        ResolveReport::Resolved { index, text, .. } => {
            assert_eq!(index, 1);
            assert_eq!(text, agreed);
        }
        other => panic!("expected resolved step, got {:?}", other),
    }
    assert_eq!(
        std::fs::read_to_string(net.path("data/pay/pay_1.csv")).unwrap(),
        agreed
    );
    assert_eq!(
        std::fs::read_to_string(net.path("data/pay/pay_0.csv")).unwrap(),
        base
    );

    // 150 % 100 = 50, 50 % 2 = 0
    assert_eq!(node.addresses(150).await.addresses, vec!["A", "B", "C"]);
    // 151 % 100 = 51, 51 % 2 = 1
    assert_eq!(node.addresses(151).await.addresses, vec!["D", "D"]);

    let paid = vec![("D".to_string(), 60), ("unrelated".to_string(), 5)];
    assert!(node.verify(151, 100, &paid).await.sufficient);
    let short = vec![("D".to_string(), 49)];
    assert!(!node.verify(151, 100, &short).await.sufficient);
}

#[tokio::test]
async fn split_peers_leave_step_partial() {
    let net = Network::new();
    write(
        &net.path("seeds/pay_0.csv"),
        &format!("Format,pluribusunum\n{}{}", net.peer("p1"), net.peer("p2")),
    );
    write(&net.path("p1/pay_1.csv"), "Format,pluribusunum\nx\n");
    write(&net.path("p2/pay_1.csv"), "Format,pluribusunum\ny\n");

    let node = Node::new(net.config()).unwrap();

    let report = stepchain_node::run(&node, Command::Resolve { height: 120 })
        .await
        .unwrap();
    assert!(!report.is_success());
    match report {
        Report::Resolve(ResolveReport::Partial { target, reached, .. }) => {
            assert_eq!((target, reached), (1, 0));
        }
        other => panic!("expected partial, got {:?}", other),
    }
    assert!(!net.path("data/pay/pay_1.csv").exists());
    assert!(node.addresses(120).await.addresses.is_empty());
}

#[tokio::test]
async fn empty_node_is_unbootstrapped() {
    let net = Network::new();
    let node = Node::new(net.config()).unwrap();

    assert_eq!(
        node.resolve(4).await,
        ResolveReport::Unbootstrapped {
            height: 4,
            target: 0
        }
    );
}
