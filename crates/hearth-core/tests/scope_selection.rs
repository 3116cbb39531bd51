use std::collections::HashSet;

use hearth_core::prelude::*;

fn scopes() -> [ConfigScope; 2] {
    [ConfigScope::Default, ConfigScope::Override(EntityId::new("mygame"))]
}

#[test]
fn every_persisted_field_has_a_page() {
    for scope in scopes() {
        let on_pages: HashSet<FieldName> = SettingsCategory::available(&scope)
            .flat_map(|category| category.fields(&scope))
            .collect();

        for field in FieldName::for_scope(&scope) {
            assert!(on_pages.contains(&field), "{field} has no page in {scope:?}");
        }
    }
}

#[test]
fn pages_only_show_fields_the_scope_persists() {
    for scope in scopes() {
        let persisted: HashSet<FieldName> = FieldName::for_scope(&scope).collect();
        for category in SettingsCategory::available(&scope) {
            for field in category.fields(&scope) {
                assert!(persisted.contains(&field), "{field} on {category} in {scope:?}");
            }
        }
    }
}

#[test]
fn advanced_is_only_offered_for_defaults() {
    let default: Vec<_> = SettingsCategory::available(&ConfigScope::Default).collect();
    let game_scope = ConfigScope::Override(EntityId::new("mygame"));
    let game: Vec<_> = SettingsCategory::available(&game_scope).collect();

    assert!(default.contains(&SettingsCategory::Advanced));
    assert!(!game.contains(&SettingsCategory::Advanced));
    assert_eq!(default.len(), game.len() + 1);
}

#[test]
fn game_card_entry_returns_to_library() {
    let selection =
        select_scope(&NavigationContext::new("mygame", "wine").from_game_card(true));
    assert_eq!(selection.return_target, ReturnTarget::Library);
    assert_eq!(selection.return_target.path(), "/");

    let selection = select_scope(&NavigationContext::new("mygame", "wine"));
    assert_eq!(selection.return_target.path(), "/gamepage/mygame");
}

#[test]
fn unknown_category_renders_no_page_but_keeps_scope() {
    let selection = select_scope(&NavigationContext::new("mygame", "graphics"));

    assert_eq!(selection.category, None);
    assert!(selection.visible_fields().is_empty());
    assert_eq!(selection.entity_id(), EntityId::new("mygame"));
}

#[test]
fn log_page_hides_context_actions() {
    let log = select_scope(&NavigationContext::new("mygame", "log"));
    let wine = select_scope(&NavigationContext::new("mygame", "wine"));

    assert!(log.context_actions().is_empty());
    assert_eq!(
        wine.context_actions(),
        vec![ContextAction::CopyToClipboard, ContextAction::OpenConfigFile]
    );
}

#[test]
fn sync_page_for_defaults_is_empty() {
    let selection = select_scope(&NavigationContext::new("default", "sync"));
    assert_eq!(selection.category, Some(SettingsCategory::Sync));
    assert!(selection.visible_fields().is_empty());
}
