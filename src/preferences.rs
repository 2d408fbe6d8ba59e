//! Customer preferences service
//!
//! Create/list of named travel preference profiles. This is a plain keyed
//! store with input validation: every creation is a new record with a
//! generated id, there is no update-in-place, and preferences are never
//! cached. Listing an empty collection is a not-found, matching the
//! resolver's convention.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::data::{CustomerPreferences, Language, SeatPreference};

/// Maximum length of a profile name, in characters
const PROFILE_NAME_MAX_CHARS: usize = 50;

/// Errors raised by the preferences service.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The customer owns no preference profiles
    #[error("no preferences found for customerId={0}")]
    NotFound(String),

    /// The submitted profile failed validation
    #[error("invalid preferences: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Durable storage could not be read or written
    #[error("preferences storage failed: {0}")]
    Storage(#[from] io::Error),
}

/// Durable storage of preference profiles, keyed by customer id.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Appends a profile to the customer's collection.
    async fn append(&self, preferences: &CustomerPreferences) -> io::Result<()>;

    /// Returns all profiles owned by the customer, oldest first.
    async fn find_by_customer(&self, customer_id: &str) -> io::Result<Vec<CustomerPreferences>>;
}

/// File-backed preferences store: one JSON file per customer.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store under the XDG data directory
    /// (`~/.local/share/railcust/preferences/` on Linux).
    ///
    /// Returns `None` if the data directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "railcust")?;
        let data_dir = project_dirs.data_dir().join("preferences");
        Some(Self { data_dir })
    }

    /// Creates a store rooted at a custom directory.
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn customer_path(&self, customer_id: &str) -> PathBuf {
        self.data_dir.join(format!("{customer_id}.json"))
    }
}

#[async_trait]
impl PreferencesStore for JsonFileStore {
    async fn append(&self, preferences: &CustomerPreferences) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let mut all = self.find_by_customer(&preferences.customer_id).await?;
        all.push(preferences.clone());

        let json = serde_json::to_string_pretty(&all)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(self.customer_path(&preferences.customer_id), json).await
    }

    async fn find_by_customer(&self, customer_id: &str) -> io::Result<Vec<CustomerPreferences>> {
        let path = self.customer_path(customer_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Create/list service over a [`PreferencesStore`].
pub struct PreferencesService {
    store: Arc<dyn PreferencesStore>,
}

impl PreferencesService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn PreferencesStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new preference profile.
    ///
    /// The returned record carries a freshly generated id.
    pub async fn create(
        &self,
        customer_id: &str,
        seat_preference: SeatPreference,
        class_preference: i32,
        profile_name: &str,
        language: Option<Language>,
    ) -> Result<CustomerPreferences, PreferencesError> {
        debug!(
            customer_id,
            ?seat_preference,
            class_preference,
            profile_name,
            "creating customer preferences"
        );

        let problems = validate(class_preference, profile_name);
        if !problems.is_empty() {
            return Err(PreferencesError::Invalid(problems));
        }

        let preferences = CustomerPreferences {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            seat_preference,
            class_preference,
            profile_name: profile_name.to_string(),
            language,
        };
        self.store.append(&preferences).await?;
        Ok(preferences)
    }

    /// Lists the customer's preference profiles.
    ///
    /// Fails with [`PreferencesError::NotFound`] when the customer owns none.
    pub async fn list(&self, customer_id: &str) -> Result<Vec<CustomerPreferences>, PreferencesError> {
        debug!(customer_id, "listing customer preferences");
        let found = self.store.find_by_customer(customer_id).await?;
        if found.is_empty() {
            return Err(PreferencesError::NotFound(customer_id.to_string()));
        }
        Ok(found)
    }
}

/// Checks the submitted fields, returning one message per problem.
fn validate(class_preference: i32, profile_name: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if !(1..=2).contains(&class_preference) {
        problems.push(format!(
            "class preference must be 1 or 2, got {class_preference}"
        ));
    }

    let char_count = profile_name.chars().count();
    if char_count == 0 || char_count > PROFILE_NAME_MAX_CHARS {
        problems.push(format!(
            "profile name must be 1 to {PROFILE_NAME_MAX_CHARS} characters long"
        ));
    }
    if !profile_name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-')
    {
        problems.push("profile name may only contain letters, spaces and hyphens".to_string());
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_in(temp_dir: &TempDir) -> PreferencesService {
        let store = JsonFileStore::with_dir(temp_dir.path().to_path_buf());
        PreferencesService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_create_generates_id_and_persists() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let created = service
            .create(
                "ad0e9b7b",
                SeatPreference::NearWindow,
                2,
                "second class window",
                Some(Language::Fr),
            )
            .await
            .expect("valid preferences should be created");

        assert!(!created.id.is_empty());
        assert_eq!(created.customer_id, "ad0e9b7b");
        assert_eq!(created.seat_preference, SeatPreference::NearWindow);
        assert_eq!(created.class_preference, 2);

        let listed = service.list("ad0e9b7b").await.expect("profile should be listed");
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_each_creation_is_a_new_record() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let first = service
            .create("c1", SeatPreference::NoPreference, 1, "work trips", None)
            .await
            .expect("create should succeed");
        let second = service
            .create("c1", SeatPreference::NearCorridor, 2, "week-ends", None)
            .await
            .expect("create should succeed");

        assert_ne!(first.id, second.id);

        let listed = service.list("c1").await.expect("profiles should be listed");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].profile_name, "work trips");
        assert_eq!(listed[1].profile_name, "week-ends");
    }

    #[tokio::test]
    async fn test_list_without_profiles_is_not_found() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let err = service.list("nobody").await.expect_err("should be not found");
        match err {
            PreferencesError::NotFound(id) => assert_eq!(id, "nobody"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_class_preference() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let err = service
            .create("c1", SeatPreference::NoPreference, 3, "valid name", None)
            .await
            .expect_err("class 3 should be rejected");

        assert!(matches!(err, PreferencesError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_profile_names() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let too_long = "a".repeat(51);
        for bad_name in ["", "névrosé!", "name_with_underscore", too_long.as_str()] {
            let result = service
                .create("c1", SeatPreference::NoPreference, 1, bad_name, None)
                .await;
            assert!(
                matches!(result, Err(PreferencesError::Invalid(_))),
                "profile name {bad_name:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_accented_letters_spaces_and_hyphens_are_valid() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        let created = service
            .create("c1", SeatPreference::NearWindow, 1, "Déplacements pro - été", None)
            .await
            .expect("accented letters should be accepted");
        assert_eq!(created.profile_name, "Déplacements pro - été");
    }

    #[tokio::test]
    async fn test_collections_are_isolated_by_customer() {
        let temp = TempDir::new().expect("temp dir");
        let service = service_in(&temp);

        service
            .create("alice", SeatPreference::NearWindow, 1, "hers", None)
            .await
            .expect("create should succeed");

        assert!(service.list("bob").await.is_err());
        assert_eq!(service.list("alice").await.unwrap().len(), 1);
    }

    #[test]
    fn test_validate_reports_all_problems_at_once() {
        let problems = validate(9, "bad_name!");
        assert_eq!(problems.len(), 2);
    }
}
