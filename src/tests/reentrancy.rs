//! Spec 5 requires a command driven from inside a notification callback to
//! be rejected synchronously rather than deferred or silently reordered.
//! `ReentrantProvider` simulates a host that (incorrectly) calls back into
//! the engine from `provide_widget`, which fires while the triggering
//! command is still on the stack.

use std::cell::Cell;

use crate::config::EngineConfig;
use crate::controller::Engine;
use crate::error::Error;
use crate::focus::Direction;
use crate::ids::{PaneId, SeededPaneIdGenerator, WidgetId};
use crate::reconciler::WidgetProvider;

struct NullProvider;

impl WidgetProvider<()> for NullProvider {
    fn provide_widget(&mut self, _widget_id: &WidgetId, _pane_id: PaneId) -> Option<()> {
        Some(())
    }

    fn widget_closing(&mut self, _widget_id: &WidgetId, _pane_id: PaneId, _handle: Option<()>) {}
}

struct ReentrantProvider {
    engine: *mut Engine<()>,
    trigger: PaneId,
    observed: Cell<Option<Error>>,
}

impl WidgetProvider<()> for ReentrantProvider {
    fn provide_widget(&mut self, _widget_id: &WidgetId, pane_id: PaneId) -> Option<()> {
        if pane_id == self.trigger {
            // SAFETY: `engine` points at the `Engine` whose `split` call is
            // driving this very callback; it's alive for the whole call.
            // This is the reentrant call under test, so it's expected to
            // return `Err(ReentrantMutation)`, not actually mutate anything.
            let engine = unsafe { &mut *self.engine };
            let err = engine.close(pane_id, &mut NullProvider).unwrap_err();
            self.observed.set(Some(err));
        }
        Some(())
    }

    fn widget_closing(&mut self, _widget_id: &WidgetId, _pane_id: PaneId, _handle: Option<()>) {}
}

#[test]
fn reentrant_command_from_provider_callback_is_rejected() {
    let mut engine = Engine::<()>::with_id_generator(EngineConfig::default(), Box::new(SeededPaneIdGenerator::new(1)));
    let mut setup_provider = NullProvider;
    let p1 = engine.insert_initial("A", &mut setup_provider).unwrap();
    let expected_new_pane = PaneId::from_uuid(uuid::Uuid::from_u128(2));

    let mut provider = ReentrantProvider {
        engine: &mut engine as *mut _,
        trigger: expected_new_pane,
        observed: Cell::new(None),
    };

    let p2 = engine.split(p1, Direction::Right, "B", 0.5, &mut provider).unwrap();
    assert_eq!(p2, expected_new_pane);
    assert!(matches!(provider.observed.into_inner(), Some(Error::ReentrantMutation)));

    // The rejected reentrant close never touched the tree: both panes from
    // the outer split are still there once it returns.
    let mut ids: Vec<_> = engine.tree().pane_ids().collect();
    ids.sort();
    let mut expected = vec![p1, p2];
    expected.sort();
    assert_eq!(ids, expected);
}
