//! In-process fake of the repository host, with a call log.
//!
//! Models just enough of the host's behavior for the pipeline stages to run
//! end-to-end: repository existence, branch heads, object creation with
//! deterministic shas, and the handful of failure modes the pipeline must
//! react to, switchable through [`Behavior`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use github_client::models::{GitCommit, GitRef, GitRefObject, Repository, TreeRef};
use github_client::{
    CreateBlobPayload, CreateCommitPayload, CreateFilePayload, CreateRefPayload,
    CreateTreePayload, Error as HostError, RepositoryCreatePayload, RepositoryHost,
    UpdateRefPayload,
};
use serde_json::json;

/// One recorded host interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    GetRepository,
    CreateRepository { auto_init: bool, private: Option<bool> },
    GetBranchRef { branch: String },
    GetCommit { sha: String },
    CreateFile { path: String, branch: Option<String> },
    CreateBlob,
    CreateTree { base_tree: Option<String>, entry_count: usize },
    CreateCommit { tree: String, parents: Vec<String> },
    CreateRef { ref_name: String },
    UpdateRef { branch: String, force: bool },
}

/// Failure modes the fake can produce.
#[derive(Debug, Default)]
pub struct Behavior {
    /// Reject bootstrap writes targeting the primary branch name.
    pub reject_primary_bootstrap: bool,
    /// Reject bootstrap writes on every branch name.
    pub reject_all_bootstrap: bool,
    /// Fail this many branch-ref reads with a transient error first.
    pub transient_ref_reads: usize,
    /// Report NotFound for this many branch-ref reads even when a head
    /// exists (simulates host-side convergence lag).
    pub hidden_head_reads: usize,
    /// Fail every blob upload.
    pub fail_blob_uploads: bool,
    /// Reject non-force ref updates.
    pub reject_non_fast_forward: bool,
    /// Bootstrap writes succeed but never become a visible head.
    pub suppress_bootstrap_head: bool,
    /// Token rejected on every call that checks it.
    pub auth_fail: bool,
    /// Rate limit every repository lookup.
    pub rate_limited: bool,
}

#[derive(Debug, Default)]
struct RemoteState {
    exists: bool,
    default_branch: Option<String>,
    /// branch -> head commit sha
    heads: HashMap<String, String>,
    /// commit sha -> tree sha
    commit_trees: HashMap<String, String>,
    blob_count: usize,
    tree_count: usize,
    commit_count: usize,
}

pub struct MockHost {
    calls: Mutex<Vec<HostCall>>,
    state: Mutex<RemoteState>,
    behavior: Mutex<Behavior>,
    tree_payloads: Mutex<Vec<CreateTreePayload>>,
    commit_payloads: Mutex<Vec<CreateCommitPayload>>,
}

impl MockHost {
    /// A destination whose repository does not exist yet.
    pub fn missing_repository() -> Self {
        Self::with_state(RemoteState::default())
    }

    /// An existing repository with no commits on any branch.
    pub fn empty_repository() -> Self {
        Self::with_state(RemoteState {
            exists: true,
            default_branch: Some("main".to_string()),
            ..RemoteState::default()
        })
    }

    /// An existing repository whose branch already has history.
    pub fn with_history(branch: &str, commit_sha: &str, tree_sha: &str) -> Self {
        let mut heads = HashMap::new();
        heads.insert(branch.to_string(), commit_sha.to_string());
        let mut commit_trees = HashMap::new();
        commit_trees.insert(commit_sha.to_string(), tree_sha.to_string());
        Self::with_state(RemoteState {
            exists: true,
            default_branch: Some(branch.to_string()),
            heads,
            commit_trees,
            ..RemoteState::default()
        })
    }

    fn with_state(state: RemoteState) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(state),
            behavior: Mutex::new(Behavior::default()),
            tree_payloads: Mutex::new(Vec::new()),
            commit_payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behavior(&self, configure: impl FnOnce(&mut Behavior)) {
        configure(&mut self.behavior.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tree_payloads(&self) -> Vec<CreateTreePayload> {
        self.tree_payloads.lock().unwrap().clone()
    }

    pub fn commit_payloads(&self) -> Vec<CreateCommitPayload> {
        self.commit_payloads.lock().unwrap().clone()
    }

    pub fn head_of(&self, branch: &str) -> Option<String> {
        self.state.lock().unwrap().heads.get(branch).cloned()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn repository_model(&self, owner: &str, repo: &str) -> Repository {
        let state = self.state.lock().unwrap();
        serde_json::from_value(json!({
            "full_name": format!("{owner}/{repo}"),
            "name": repo,
            "node_id": "MDEwOlJlcG9zaXRvcnkx",
            "private": true,
            "default_branch": state.default_branch,
        }))
        .expect("mock repository JSON is valid")
    }
}

#[async_trait]
impl RepositoryHost for MockHost {
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, HostError> {
        self.record(HostCall::GetRepository);
        let behavior = self.behavior.lock().unwrap();
        if behavior.auth_fail {
            return Err(HostError::AuthError("Bad credentials".to_string()));
        }
        if behavior.rate_limited {
            return Err(HostError::RateLimitExceeded { remaining: Some(0) });
        }
        drop(behavior);
        if !self.state.lock().unwrap().exists {
            return Err(HostError::NotFound);
        }
        Ok(self.repository_model(owner, repo))
    }

    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, HostError> {
        self.record(HostCall::CreateRepository {
            auto_init: payload.auto_init,
            private: payload.private,
        });
        {
            let mut state = self.state.lock().unwrap();
            state.exists = true;
            // Hosts report the account-configured default even before the
            // first commit lands.
            state.default_branch = Some("main".to_string());
        }
        Ok(self.repository_model("test-owner", &payload.name))
    }

    async fn get_branch_ref(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
    ) -> Result<GitRef, HostError> {
        self.record(HostCall::GetBranchRef {
            branch: branch.to_string(),
        });
        {
            let mut behavior = self.behavior.lock().unwrap();
            if behavior.transient_ref_reads > 0 {
                behavior.transient_ref_reads -= 1;
                return Err(HostError::Transient("connection reset".to_string()));
            }
            if behavior.hidden_head_reads > 0 {
                behavior.hidden_head_reads -= 1;
                return Err(HostError::NotFound);
            }
        }
        let state = self.state.lock().unwrap();
        match state.heads.get(branch) {
            Some(sha) => Ok(GitRef {
                ref_name: format!("refs/heads/{branch}"),
                object: GitRefObject {
                    sha: sha.clone(),
                    object_type: "commit".to_string(),
                },
            }),
            None => Err(HostError::NotFound),
        }
    }

    async fn get_commit(
        &self,
        _owner: &str,
        _repo: &str,
        sha: &str,
    ) -> Result<GitCommit, HostError> {
        self.record(HostCall::GetCommit {
            sha: sha.to_string(),
        });
        let state = self.state.lock().unwrap();
        match state.commit_trees.get(sha) {
            Some(tree_sha) => Ok(GitCommit {
                sha: sha.to_string(),
                tree: TreeRef {
                    sha: tree_sha.clone(),
                },
            }),
            None => Err(HostError::NotFound),
        }
    }

    async fn create_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        payload: &CreateFilePayload,
    ) -> Result<(), HostError> {
        self.record(HostCall::CreateFile {
            path: path.to_string(),
            branch: payload.branch.clone(),
        });
        let branch = payload.branch.clone().unwrap_or_else(|| "main".to_string());
        let behavior = self.behavior.lock().unwrap();
        if behavior.reject_all_bootstrap
            || (behavior.reject_primary_bootstrap && branch == "main")
        {
            return Err(HostError::Validation("Branch name is not valid".to_string()));
        }
        let suppress = behavior.suppress_bootstrap_head;
        drop(behavior);

        let mut state = self.state.lock().unwrap();
        if state.heads.contains_key(&branch) {
            return Err(HostError::Validation(
                "Invalid request.\n\n\"sha\" wasn't supplied.".to_string(),
            ));
        }
        if !suppress {
            state.heads.insert(branch, "bootstrap-commit".to_string());
            state
                .commit_trees
                .insert("bootstrap-commit".to_string(), "bootstrap-tree".to_string());
        }
        Ok(())
    }

    async fn create_blob(
        &self,
        _owner: &str,
        _repo: &str,
        _payload: &CreateBlobPayload,
    ) -> Result<String, HostError> {
        self.record(HostCall::CreateBlob);
        if self.behavior.lock().unwrap().fail_blob_uploads {
            return Err(HostError::ApiError());
        }
        let mut state = self.state.lock().unwrap();
        state.blob_count += 1;
        Ok(format!("blob-sha-{}", state.blob_count))
    }

    async fn create_tree(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &CreateTreePayload,
    ) -> Result<String, HostError> {
        self.record(HostCall::CreateTree {
            base_tree: payload.base_tree.clone(),
            entry_count: payload.tree.len(),
        });
        self.tree_payloads.lock().unwrap().push(payload.clone());
        let mut state = self.state.lock().unwrap();
        state.tree_count += 1;
        Ok(format!("tree-sha-{}", state.tree_count))
    }

    async fn create_commit(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &CreateCommitPayload,
    ) -> Result<String, HostError> {
        self.record(HostCall::CreateCommit {
            tree: payload.tree.clone(),
            parents: payload.parents.clone(),
        });
        self.commit_payloads.lock().unwrap().push(payload.clone());
        let mut state = self.state.lock().unwrap();
        state.commit_count += 1;
        let sha = format!("commit-sha-{}", state.commit_count);
        state.commit_trees.insert(sha.clone(), payload.tree.clone());
        Ok(sha)
    }

    async fn create_ref(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &CreateRefPayload,
    ) -> Result<(), HostError> {
        self.record(HostCall::CreateRef {
            ref_name: payload.ref_name.clone(),
        });
        let branch = payload
            .ref_name
            .strip_prefix("refs/heads/")
            .unwrap_or(&payload.ref_name)
            .to_string();
        let mut state = self.state.lock().unwrap();
        if state.heads.contains_key(&branch) {
            return Err(HostError::Validation("Reference already exists".to_string()));
        }
        state.heads.insert(branch, payload.sha.clone());
        Ok(())
    }

    async fn update_ref(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        payload: &UpdateRefPayload,
    ) -> Result<(), HostError> {
        self.record(HostCall::UpdateRef {
            branch: branch.to_string(),
            force: payload.force,
        });
        if !payload.force && self.behavior.lock().unwrap().reject_non_fast_forward {
            return Err(HostError::Validation(
                "Update is not a fast forward".to_string(),
            ));
        }
        self.state
            .lock()
            .unwrap()
            .heads
            .insert(branch.to_string(), payload.sha.clone());
        Ok(())
    }
}
