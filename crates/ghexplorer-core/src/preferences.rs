use std::rc::Rc;

use ghexplorer_cache::CacheManager;

use crate::Result;

/// Storage key kept from the mobile app so exported settings stay readable
const DARK_MODE_KEY: &str = "darkMode";

/// Small persisted UI preferences
pub struct Preferences {
    store: Option<Rc<CacheManager>>,
    dark_mode: bool,
}

impl Preferences {
    pub fn in_memory() -> Self {
        Self {
            store: None,
            dark_mode: true,
        }
    }

    /// Dark mode is the default until the user says otherwise
    pub fn load(store: Rc<CacheManager>) -> Result<Self> {
        let dark_mode = store.get_setting::<bool>(DARK_MODE_KEY)?.unwrap_or(true);
        Ok(Self {
            store: Some(store),
            dark_mode,
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        if let Some(store) = &self.store {
            store.set_setting(DARK_MODE_KEY, &enabled)?;
        }
        self.dark_mode = enabled;
        Ok(())
    }

    /// Returns the new value
    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }
}
