//! Scope selection from navigation context.

use std::fmt;

use crate::settings::fields::FieldName;
use crate::types::{ConfigScope, EntityId};

/// Settings category pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsCategory {
    General,
    Wine,
    Sync,
    Other,
    Log,
    /// Only reachable under the default scope.
    Advanced,
}

impl SettingsCategory {
    pub const ALL: [SettingsCategory; 6] = [
        SettingsCategory::General,
        SettingsCategory::Wine,
        SettingsCategory::Sync,
        SettingsCategory::Other,
        SettingsCategory::Log,
        SettingsCategory::Advanced,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "general" => Some(SettingsCategory::General),
            "wine" => Some(SettingsCategory::Wine),
            "sync" => Some(SettingsCategory::Sync),
            "other" => Some(SettingsCategory::Other),
            "log" => Some(SettingsCategory::Log),
            "advanced" => Some(SettingsCategory::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsCategory::General => "general",
            SettingsCategory::Wine => "wine",
            SettingsCategory::Sync => "sync",
            SettingsCategory::Other => "other",
            SettingsCategory::Log => "log",
            SettingsCategory::Advanced => "advanced",
        }
    }

    pub fn is_available_in(&self, scope: &ConfigScope) -> bool {
        *self != SettingsCategory::Advanced || scope.is_default()
    }

    /// Categories reachable in `scope`, in menu order.
    pub fn available(scope: &ConfigScope) -> impl Iterator<Item = SettingsCategory> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |category| category.is_available_in(scope))
    }

    /// Fields edited on this page, restricted to what `scope` persists.
    pub fn fields(&self, scope: &ConfigScope) -> Vec<FieldName> {
        use FieldName as F;

        let page: &[FieldName] = match self {
            SettingsCategory::General => &[
                F::EgsLinkedPath,
                F::DefaultInstallPath,
                F::ExitToTray,
                F::StartInTray,
                F::MinimizeOnLaunch,
                F::DarkTrayIcon,
                F::MaxWorkers,
                F::ShowUnrealMarket,
                F::DisableController,
            ],
            SettingsCategory::Wine => &[
                F::WineVersion,
                F::DefaultWinePrefix,
                F::WinePrefix,
                F::WineCrossoverBottle,
                F::CustomWinePaths,
                F::AutoInstallDxvk,
                F::AutoInstallVkd3d,
                F::EnableFsr,
                F::MaxSharpness,
                F::EnableResizableBar,
                F::EnableEsync,
                F::EnableFsync,
            ],
            SettingsCategory::Sync => &[F::SavesPath, F::AutoSyncSaves],
            SettingsCategory::Other => &[
                F::OtherOptions,
                F::LauncherArgs,
                F::TargetExe,
                F::UseGameMode,
                F::NvidiaPrime,
                F::ShowFps,
                F::OfflineMode,
                F::AudioFix,
                F::ShowMangohud,
                F::UseSteamRuntime,
                F::MaxRecentGames,
                F::AddDesktopShortcuts,
                F::AddStartMenuShortcuts,
                F::DiscordRpc,
            ],
            SettingsCategory::Advanced => &[F::AltLegendaryBin, F::AltGogdlBin],
            SettingsCategory::Log => &[],
        };

        page.iter()
            .copied()
            .filter(|field| field.membership().allowed_in(scope))
            .collect()
    }
}

impl fmt::Display for SettingsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the settings screen was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    pub entity_id: EntityId,
    pub category: String,
    /// Entered from a library card rather than the game's own page.
    pub from_game_card: bool,
}

impl NavigationContext {
    pub fn new(entity_id: impl Into<EntityId>, category: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            category: category.into(),
            from_game_card: false,
        }
    }

    pub fn from_game_card(mut self, from_game_card: bool) -> Self {
        self.from_game_card = from_game_card;
        self
    }
}

/// Route the back button leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnTarget {
    Library,
    GamePage(EntityId),
}

impl ReturnTarget {
    pub fn path(&self) -> String {
        match self {
            ReturnTarget::Library => "/".to_string(),
            ReturnTarget::GamePage(entity) => format!("/gamepage/{entity}"),
        }
    }
}

/// Auxiliary actions offered from the screen's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    CopyToClipboard,
    OpenConfigFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSelection {
    pub scope: ConfigScope,
    /// `None` renders no category page.
    pub category: Option<SettingsCategory>,
    pub return_target: ReturnTarget,
}

impl ScopeSelection {
    pub fn entity_id(&self) -> EntityId {
        self.scope.entity_id()
    }

    /// Context menu entries; none on the log page.
    pub fn context_actions(&self) -> Vec<ContextAction> {
        if self.category == Some(SettingsCategory::Log) {
            return Vec::new();
        }
        vec![ContextAction::CopyToClipboard, ContextAction::OpenConfigFile]
    }

    /// Fields of the selected page, empty when no page is rendered.
    pub fn visible_fields(&self) -> Vec<FieldName> {
        self.category
            .map(|category| category.fields(&self.scope))
            .unwrap_or_default()
    }
}

/// Derive scope, category and return target from navigation context.
pub fn select_scope(nav: &NavigationContext) -> ScopeSelection {
    let scope = ConfigScope::for_entity(&nav.entity_id);

    let category = SettingsCategory::from_token(&nav.category)
        .filter(|category| category.is_available_in(&scope));

    let return_target = if nav.from_game_card || nav.entity_id.is_default() {
        ReturnTarget::Library
    } else {
        ReturnTarget::GamePage(nav.entity_id.clone())
    };

    ScopeSelection {
        scope,
        category,
        return_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sentinel_selects_default_scope() {
        let selection = select_scope(&NavigationContext::new("default", "general"));
        assert_eq!(selection.scope, ConfigScope::Default);
        assert_eq!(selection.category, Some(SettingsCategory::General));
    }

    #[test]
    fn advanced_resolves_to_nothing_for_overrides() {
        let selection = select_scope(&NavigationContext::new("mygame", "advanced"));
        assert_eq!(
            selection.scope,
            ConfigScope::Override(EntityId::new("mygame"))
        );
        assert_eq!(selection.category, None);
        assert!(selection.visible_fields().is_empty());
    }

    #[test]
    fn advanced_is_reachable_for_default() {
        let selection = select_scope(&NavigationContext::new("default", "advanced"));
        assert_eq!(selection.category, Some(SettingsCategory::Advanced));
    }

    #[test]
    fn unknown_category_renders_nothing() {
        let selection = select_scope(&NavigationContext::new("mygame", "graphics"));
        assert_eq!(selection.category, None);
    }

    #[test]
    fn return_target_points_at_game_page() {
        let selection = select_scope(&NavigationContext::new("mygame", "wine"));
        assert_eq!(selection.return_target.path(), "/gamepage/mygame");
    }

    #[test]
    fn return_target_from_game_card_is_library() {
        let nav = NavigationContext::new("mygame", "wine").from_game_card(true);
        assert_eq!(select_scope(&nav).return_target, ReturnTarget::Library);
    }

    #[test]
    fn return_target_never_points_at_default_game_page() {
        let selection = select_scope(&NavigationContext::new("default", "wine"));
        assert_eq!(selection.return_target.path(), "/");
    }

    #[test]
    fn log_page_has_no_context_actions() {
        let selection = select_scope(&NavigationContext::new("mygame", "log"));
        assert!(selection.context_actions().is_empty());

        let selection = select_scope(&NavigationContext::new("mygame", "other"));
        assert_eq!(selection.context_actions().len(), 2);
    }

    #[test]
    fn category_fields_respect_scope() {
        let game = ConfigScope::Override(EntityId::new("mygame"));
        for category in SettingsCategory::ALL {
            for field in category.fields(&game) {
                assert!(field.membership().allowed_in(&game), "{category}: {field}");
            }
            for field in category.fields(&ConfigScope::Default) {
                assert!(field.membership().allowed_in(&ConfigScope::Default));
            }
        }
        assert!(SettingsCategory::Sync.fields(&ConfigScope::Default).is_empty());
        assert!(
            !SettingsCategory::Wine
                .fields(&game)
                .contains(&FieldName::CustomWinePaths)
        );
    }
}
