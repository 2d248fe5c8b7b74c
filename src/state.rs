use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::form::SingleKeyForm;
use crate::models::SearchSpaceId;
use crate::services::catalog::Catalog;
use crate::services::connectors::ConnectorRegistrar;
use crate::views::connectors_href;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub registrar: Arc<dyn ConnectorRegistrar>,
    pub forms: Arc<FormRegistry>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, registrar: Arc<dyn ConnectorRegistrar>) -> Self {
        Self {
            catalog,
            registrar,
            forms: Arc::new(FormRegistry::default()),
        }
    }
}

type FormKey = (SearchSpaceId, String);

/// Live single-key forms, one per search space and connector.
#[derive(Default)]
pub struct FormRegistry {
    forms: Mutex<HashMap<FormKey, Arc<SingleKeyForm>>>,
}

impl FormRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<FormKey, Arc<SingleKeyForm>>> {
        self.forms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, search_space_id: SearchSpaceId, connector_id: &str) -> Option<Arc<SingleKeyForm>> {
        self.lock()
            .get(&(search_space_id, connector_id.to_string()))
            .cloned()
    }

    pub fn mount(
        &self,
        search_space_id: SearchSpaceId,
        connector_id: &str,
        connector_type: &str,
        label: &str,
    ) -> Arc<SingleKeyForm> {
        self.lock()
            .entry((search_space_id, connector_id.to_string()))
            .or_insert_with(|| {
                let target = connectors_href(search_space_id);
                Arc::new(
                    SingleKeyForm::new(connector_type, label, search_space_id).on_success(Arc::new(
                        move || tracing::info!(redirect = %target, "navigating to connectors list"),
                    )),
                )
            })
            .clone()
    }

    /// Removes `form` unless a newer form replaced it or a submission is still running.
    pub fn release_if_idle(
        &self,
        search_space_id: SearchSpaceId,
        connector_id: &str,
        form: &Arc<SingleKeyForm>,
    ) -> bool {
        let mut forms = self.lock();
        let key = (search_space_id, connector_id.to_string());
        match forms.get(&key) {
            Some(live) if Arc::ptr_eq(live, form) && !live.is_in_flight() => {
                forms.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_reuses_the_live_form() {
        let registry = FormRegistry::default();
        let first = registry.mount(SearchSpaceId(1), "todoist-connector", "TODOIST_CONNECTOR", "Todoist API Key");
        first.set_secret("tok");
        let second = registry.mount(SearchSpaceId(1), "todoist-connector", "TODOIST_CONNECTOR", "Todoist API Key");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.has_secret());

        registry.mount(SearchSpaceId(2), "todoist-connector", "TODOIST_CONNECTOR", "Todoist API Key");
        assert_eq!(registry.len(), 2);

        registry.release_if_idle(SearchSpaceId(1), "todoist-connector", &first);
        assert!(registry.get(SearchSpaceId(1), "todoist-connector").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn release_if_idle_only_removes_the_same_settled_form() {
        let registry = FormRegistry::default();
        let stale = Arc::new(SingleKeyForm::new("TODOIST_CONNECTOR", "Todoist API Key", SearchSpaceId(1)));
        let live = registry.mount(SearchSpaceId(1), "todoist-connector", "TODOIST_CONNECTOR", "Todoist API Key");

        assert!(!registry.release_if_idle(SearchSpaceId(1), "todoist-connector", &stale));
        assert_eq!(registry.len(), 1);
        assert!(!registry.release_if_idle(SearchSpaceId(2), "todoist-connector", &live));

        assert!(registry.release_if_idle(SearchSpaceId(1), "todoist-connector", &live));
        assert!(registry.is_empty());
    }
}
