use crate::{Effect, HarvestState, Msg, ResultRow, SessionState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Effects are returned in execution order. A fetched page yields its row
/// save, an optional checkpoint, then either the next fetch or `Finish`.
pub fn update(mut state: HarvestState, msg: Msg) -> (HarvestState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.session() == SessionState::Idle {
                vec![next_step(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::PageFetched { id, result } => {
            // Only the page currently in flight is accepted.
            if state.session() != (SessionState::Fetching { id }) {
                return (state, Vec::new());
            }

            let (row, scraped) = match result.into_usable_text() {
                Some(text) => (ResultRow::scraped(id, text), true),
                None => (ResultRow::failed(id), false),
            };
            state.record(row.clone(), scraped);

            let mut effects = Vec::with_capacity(3);
            effects.push(Effect::SaveRow { row, scraped });
            if state.checkpoint_due(id) {
                effects.push(Effect::SaveCheckpoint { after_id: id });
            }
            effects.push(next_step(&mut state));
            effects
        }
    };

    (state, effects)
}

fn next_step(state: &mut HarvestState) -> Effect {
    match state.stop_reason() {
        Some(reason) => {
            state.set_session(SessionState::Finished(reason));
            Effect::Finish { reason }
        }
        None => {
            let id = state.next_id();
            state.set_session(SessionState::Fetching { id });
            Effect::FetchPage {
                id,
                url: state.plan().url_for(id),
            }
        }
    }
}
