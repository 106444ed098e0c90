//! Hasad marketplace client
//!
//! Client core of the Hasad rooftop-farm marketplace: farm profile
//! registration and review lifecycle, support tickets and subscription
//! status, backed by a Supabase project.

pub mod auth;
pub mod config;
pub mod error;
pub mod farm;
pub mod i18n;
pub mod subscription;
pub mod support;

use reqwest::Client;
use std::sync::Arc;

use hasad_functions::FunctionsClient;
use hasad_postgrest::PostgrestClient;
use hasad_storage::StorageClient;

use crate::auth::{Identity, IdentityProvider};
use crate::config::{ClientOptions, HasadConfig};
use crate::error::{Error, Result};
use crate::farm::{FarmCollectionManager, Prompt, SupabaseFarmStore};
use crate::i18n::Translator;
use crate::support::SupportDesk;

/// The main entry point for the Hasad client
pub struct Hasad {
    /// Project URL and anonymous key
    pub config: HasadConfig,
    /// Client options
    pub options: ClientOptions,
    /// HTTP client shared by every service
    pub http_client: Client,
}

impl Hasad {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hasad::Hasad;
    ///
    /// let hasad = Hasad::new("https://your-project-url.supabase.co", "your-anon-key").unwrap();
    /// ```
    pub fn new(supabase_url: &str, supabase_key: &str) -> Result<Self> {
        Self::new_with_options(supabase_url, supabase_key, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hasad::{Hasad, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_photo_bucket("roof-images");
    /// let hasad = Hasad::new_with_options(
    ///     "https://your-project-url.supabase.co",
    ///     "your-anon-key",
    ///     options,
    /// )
    /// .unwrap();
    /// ```
    pub fn new_with_options(
        supabase_url: &str,
        supabase_key: &str,
        options: ClientOptions,
    ) -> Result<Self> {
        let config = HasadConfig::new(supabase_url, supabase_key)?;
        Self::from_config(config, options)
    }

    pub fn from_config(config: HasadConfig, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            config,
            options,
            http_client,
        })
    }

    /// Table client for ad-hoc queries
    pub fn from(&self, table: &str) -> Result<PostgrestClient> {
        Ok(PostgrestClient::new(
            self.config.base_url(),
            &self.config.anon_key,
            table,
            self.http_client.clone(),
        )?)
    }

    pub fn storage(&self) -> StorageClient {
        StorageClient::new(
            self.config.base_url(),
            &self.config.anon_key,
            self.http_client.clone(),
        )
    }

    pub fn functions(&self) -> FunctionsClient {
        FunctionsClient::new(
            self.config.base_url(),
            &self.config.anon_key,
            self.http_client.clone(),
        )
    }

    /// Farm persistence acting as `identity`
    pub fn farm_store(&self, identity: &Identity) -> SupabaseFarmStore {
        let store = SupabaseFarmStore::new(
            self.config.base_url(),
            &self.config.anon_key,
            self.options.clone(),
            self.http_client.clone(),
        );
        match &identity.access_token {
            Some(token) => store.with_auth(token),
            None => store,
        }
    }

    /// Farm list of the signed-in user
    pub fn farms(
        &self,
        identity: &dyn IdentityProvider,
        translator: Arc<dyn Translator>,
        prompt: Arc<dyn Prompt>,
    ) -> Result<FarmCollectionManager> {
        let identity = signed_in(identity)?;
        let store = Arc::new(self.farm_store(&identity));

        Ok(FarmCollectionManager::new(
            identity.user_id,
            store,
            translator,
            prompt,
            self.options.clone(),
        ))
    }

    /// Support ticket intake for the signed-in user
    pub fn support(
        &self,
        identity: &dyn IdentityProvider,
        translator: Arc<dyn Translator>,
    ) -> Result<SupportDesk> {
        let identity = signed_in(identity)?;
        let functions = match &identity.access_token {
            Some(token) => self.functions().with_auth(token),
            None => self.functions(),
        };

        Ok(SupportDesk::new(
            functions,
            &self.options.support_function,
            identity.user_id,
            translator,
        ))
    }
}

fn signed_in(identity: &dyn IdentityProvider) -> Result<Identity> {
    identity
        .current_identity()
        .ok_or_else(|| Error::auth("no signed-in user"))
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Identity, IdentityProvider, Session, UserId, UserRole};
    pub use crate::config::{ClientOptions, HasadConfig};
    pub use crate::error::{Error, Result};
    pub use crate::farm::{
        CropType, DeleteOutcome, FarmCollectionManager, FarmDraftForm, FarmError, FarmField,
        FarmRecord, FarmStatus, FarmStore, HousingType, PhotoFile, Prompt, SubmitOutcome,
    };
    pub use crate::i18n::{Catalog, Language, Translator};
    pub use crate::support::{ContactMethod, SupportDesk};
    pub use crate::Hasad;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{UserId, UserRole};
    use crate::i18n::{Catalog, Language};
    use async_trait::async_trait;

    struct Silent;

    #[async_trait]
    impl Prompt for Silent {
        async fn confirm(&self, _message: &str) -> bool {
            false
        }

        fn alert(&self, _message: &str) {}
    }

    struct SignedOut;

    impl IdentityProvider for SignedOut {
        fn current_identity(&self) -> Option<Identity> {
            None
        }
    }

    #[test]
    fn rejects_bad_url() {
        assert!(matches!(Hasad::new("not a url", "key"), Err(Error::Url(_))));
    }

    #[test]
    fn farms_require_a_signed_in_user() {
        let hasad = Hasad::new("http://localhost:54321", "anon").unwrap();
        let translator = Arc::new(Catalog::new(Language::En));

        let result = hasad.farms(&SignedOut, translator.clone(), Arc::new(Silent));
        assert!(matches!(result, Err(Error::Auth(_))));

        let identity = Identity {
            user_id: UserId::new("u-1"),
            role: UserRole::Farmer,
            access_token: None,
        };
        let manager = hasad.farms(&identity, translator, Arc::new(Silent)).unwrap();
        assert_eq!(manager.user_id(), &UserId::new("u-1"));
        assert!(manager.farms().is_empty());
    }
}
