//! Git acquisition via libgit2
//!
//! This module handles:
//! - Shallow-cloning repositories (HTTPS and SSH)
//! - Normalizing SCP-style SSH URLs for libgit2
//! - Authentication via git's native credential system
//! - Interpreting libgit2 errors into fetch-error kinds
//! - Deadline-based cancellation from the transfer callback

use std::path::Path;
use std::time::Instant;

use git2::{build::RepoBuilder, Cred, CredentialType, ErrorClass, FetchOptions, RemoteCallbacks};

use crate::error::FetchErrorKind;

/// Outcome of a failed clone, before it is lifted into `MarketplaceError`
#[derive(Debug)]
pub enum CloneFailure {
    /// The deadline passed while transferring
    TimedOut,
    /// Any other failure, classified
    Failed { kind: FetchErrorKind, reason: String },
}

/// Shallow-clone `url` into `target`, which must be empty or absent.
///
/// Authentication is delegated to git's native credential system (SSH keys,
/// agent, credential helpers). The `.git` subtree is removed on success, so
/// the target holds a plain tree.
pub fn clone_tree(url: &str, target: &Path, deadline: Instant) -> Result<(), CloneFailure> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);
    callbacks.transfer_progress(move |_| Instant::now() < deadline);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    fetch_options.depth(1);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let url_to_clone = normalize_ssh_url(url);
    if let Err(e) = builder.clone(url_to_clone.as_ref(), target) {
        if Instant::now() >= deadline {
            return Err(CloneFailure::TimedOut);
        }
        let (kind, reason) = interpret_git_error(&e);
        return Err(CloneFailure::Failed { kind, reason });
    }

    // Keep only the working tree
    let git_dir = target.join(".git");
    if git_dir.exists() {
        std::fs::remove_dir_all(&git_dir).map_err(|e| CloneFailure::Failed {
            kind: FetchErrorKind::Other,
            reason: format!("failed to strip .git directory: {e}"),
        })?;
    }

    Ok(())
}

/// Normalize SSH URLs from SCP-style (git@host:path) to ssh:// form.
///
/// libgit2 may have issues with SCP-style SSH URLs, so we convert them to
/// the explicit ssh:// form for better compatibility.
pub fn normalize_ssh_url(url: &str) -> std::borrow::Cow<'_, str> {
    if !url.starts_with("git@") || url.starts_with("ssh://") {
        return std::borrow::Cow::Borrowed(url);
    }

    if let Some(colon_pos) = url.find(':') {
        let host_part = &url[..colon_pos];
        let path_part = &url[colon_pos + 1..];
        let normalized_path = if path_part.starts_with('/') {
            path_part.to_string()
        } else {
            format!("/{path_part}")
        };
        return std::borrow::Cow::Owned(format!("ssh://{host_part}{normalized_path}"));
    }

    std::borrow::Cow::Borrowed(url)
}

type ErrorCheck = fn(&str, ErrorClass) -> bool;

const ERROR_CLASSIFICATIONS: &[(ErrorCheck, FetchErrorKind)] = &[
    (
        |msg, _| {
            msg.contains("not found")
                || msg.contains("404")
                || msg.contains("too many redirects")
                || msg.contains("authentication replays")
        },
        FetchErrorKind::RepositoryNotFound,
    ),
    (
        |msg, _| msg.contains("authentication") || msg.contains("credentials"),
        FetchErrorKind::AuthenticationFailed,
    ),
    (
        |msg, _| msg.contains("permission denied") || msg.contains("access denied"),
        FetchErrorKind::PermissionDenied,
    ),
    (
        |msg, _| {
            msg.contains("connection")
                || msg.contains("network")
                || msg.contains("timeout")
                || msg.contains("timed out")
        },
        FetchErrorKind::Network,
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("certificate"),
        FetchErrorKind::Certificate,
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("ssl"),
        FetchErrorKind::Ssl,
    ),
];

/// Interpret a git2 error into a fetch-error kind and a user-facing reason
pub fn interpret_git_error(err: &git2::Error) -> (FetchErrorKind, String) {
    let message = err.message().to_lowercase();

    for (check, kind) in ERROR_CLASSIFICATIONS {
        if check(message.as_str(), err.class()) {
            return (*kind, kind.to_string());
        }
    }

    let reason = match err.class() {
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        ErrorClass::Ssh => format!("SSH error: {}", err.message()),
        _ => err.message().to_string(),
    };
    (FetchErrorKind::Other, reason)
}

/// Set up authentication callbacks for git operations.
///
/// Delegates to git's native credential system:
/// - SSH keys from ~/.ssh/ and the SSH agent
/// - Git credential helpers
/// - Username/password from the environment
fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(username) = username_from_url {
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                let home = dirs::home_dir().unwrap_or_default();
                let ssh_dir = home.join(".ssh");
                for key_name in &["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let private_key = ssh_dir.join(key_name);
                    let public_key = ssh_dir.join(format!("{key_name}.pub"));

                    if private_key.exists() {
                        let public_key_path = public_key.exists().then_some(public_key.as_path());
                        if let Ok(cred) =
                            Cred::ssh_key(username, public_key_path, &private_key, None)
                        {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }

            // Public HTTPS repos accept empty credentials; trying them lets
            // the server report the real error
            if let Ok(cred) = Cred::userpass_plaintext("", "") {
                return Ok(cred);
            }
            if let Some(username) = username_from_url {
                if let Ok(cred) = Cred::userpass_plaintext(username, "") {
                    return Ok(cred);
                }
            }
            for username in &["git", "anonymous"] {
                if let Ok(cred) = Cred::userpass_plaintext(username, "") {
                    return Ok(cred);
                }
            }
        }

        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication failed",
        ))
    });
}
