#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// Returns a Command running our binary with logs kept out of the fixture.
#[allow(deprecated)]
pub fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("TAGVER_LOG_DIR", std::env::temp_dir().join("tagver-test-logs"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A throwaway git repository with deterministic commit times.
pub struct Fixture {
    dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl Fixture {
    /// An initialized repository without commits.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");
        let mut config = repo.config().expect("failed to open repo config");
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        Self {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    /// A repository with `n` commits.
    pub fn with_commits(n: usize) -> Self {
        let mut fixture = Self::new();
        for i in 0..n {
            fixture.commit(&format!("file_{i}.txt"), &format!("content {i}\n"));
        }
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> &str {
        self.path().to_str().expect("temp dir is not UTF-8")
    }

    /// Write a file into the working tree without staging it.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Write, stage and commit a file on top of HEAD.
    pub fn commit(&mut self, name: &str, content: &str) -> Oid {
        self.write(name, content);

        let mut index = self.repo.index().expect("failed to get index");
        index.add_path(Path::new(name)).expect("failed to add to index");
        index.write().expect("failed to write index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("failed to find tree");

        self.clock += 60;
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0))
            .expect("failed to create signature");

        let parent = self.head();
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, &format!("add {name}"), &tree, &parents)
            .expect("failed to commit")
    }

    /// Commit a copy of `parent`'s tree on a detached side line, leaving HEAD alone.
    pub fn side_commit(&mut self, parent: Oid) -> Oid {
        let parent = self.repo.find_commit(parent).expect("missing parent");
        let tree = parent.tree().expect("missing tree");
        self.clock += 60;
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0))
            .expect("failed to create signature");
        self.repo
            .commit(None, &sig, &sig, "side commit", &tree, &[&parent])
            .expect("failed to commit")
    }

    fn head(&self) -> Option<git2::Commit<'_>> {
        self.repo.head().ok().and_then(|h| h.peel_to_commit().ok())
    }

    pub fn head_id(&self) -> Oid {
        self.head().expect("repository has no commits").id()
    }

    pub fn annotated_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).expect("missing object");
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0))
            .expect("failed to create signature");
        self.repo
            .tag(name, &object, &sig, &format!("release {name}"), false)
            .expect("failed to create tag");
    }

    pub fn lightweight_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).expect("missing object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("failed to create tag");
    }

    pub fn tag_names(&self) -> Vec<String> {
        let names = self.repo.tag_names(None).expect("failed to list tags");
        names.iter().flatten().map(str::to_string).collect()
    }

    /// Message and target commit of an annotated tag.
    pub fn tag_details(&self, name: &str) -> (String, Oid) {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{name}"))
            .expect("tag not found");
        let tag = reference.peel_to_tag().expect("not an annotated tag");
        let message = tag.message().unwrap_or_default().trim_end().to_string();
        (message, tag.target_id())
    }
}
