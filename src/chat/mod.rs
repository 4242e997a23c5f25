//! The chat integration, as far as the forms care about it: whether it is running, and who can be
//! picked as a cleaner's chat identity.

use failure::{Fallible, ResultExt};
use serde_derive::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// A user of the chat platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChatUser {
    /// The platform's ID of the user.
    pub id: String,

    /// The display name.
    pub name: String,
}

/// Queries the chat integration.
pub trait ChatDirectory: Send + Sync {
    /// Whether the integration is switched on and reachable.
    fn is_running(&self) -> bool;

    /// The users a cleaner can be linked to.
    fn users(&self) -> Fallible<Vec<ChatUser>>;
}

/// The chat integration being switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl ChatDirectory for Offline {
    fn is_running(&self) -> bool {
        false
    }

    fn users(&self) -> Fallible<Vec<ChatUser>> {
        Ok(Vec::new())
    }
}

/// A fixed list of chat users, e.g. exported from the workspace's admin page.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    users: Vec<ChatUser>,
}

impl StaticDirectory {
    pub fn new(users: Vec<ChatUser>) -> StaticDirectory {
        StaticDirectory { users }
    }

    /// Loads the users from a JSON array of `{"id": ..., "name": ...}` objects.
    pub fn load(path: &Path) -> Fallible<StaticDirectory> {
        let file = File::open(path)
            .with_context(|_| format!("Couldn't open the chat user list {}", path.display()))?;
        let users = serde_json::from_reader(BufReader::new(file))
            .with_context(|_| format!("Couldn't parse the chat user list {}", path.display()))?;
        Ok(StaticDirectory::new(users))
    }
}

impl ChatDirectory for StaticDirectory {
    fn is_running(&self) -> bool {
        true
    }

    fn users(&self) -> Fallible<Vec<ChatUser>> {
        let mut users = self.users.clone();
        users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, process};

    #[test]
    fn offline_is_not_running() {
        assert!(!Offline.is_running());
        assert!(Offline.users().unwrap().is_empty());
    }

    #[test]
    fn loads_and_sorts_users() {
        let path = env::temp_dir().join(format!("putzplan-chat-{}.json", process::id()));
        fs::write(
            &path,
            r#"[{"id": "U2", "name": "bernd"}, {"id": "U1", "name": "Anna"}]"#,
        )
        .unwrap();
        let directory = StaticDirectory::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(directory.is_running());
        let names = directory
            .users()
            .unwrap()
            .into_iter()
            .map(|user| user.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Anna", "bernd"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = StaticDirectory::load(Path::new("/nonexistent/chat.json")).unwrap_err();
        assert!(err.to_string().contains("Couldn't open"));
    }
}
