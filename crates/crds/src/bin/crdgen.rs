//! CRD generation binary
//!
//! Prints the GithubIssue CustomResourceDefinition as YAML:
//! `cargo run -p crds --bin crdgen > config/crd/githubissues.yaml`

use crds::GithubIssue;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&GithubIssue::crd())?);
    Ok(())
}
