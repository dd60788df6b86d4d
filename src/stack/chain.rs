//! The chain: a LIFO stack of activated effects.
//!
//! Links are pushed in activation order and resolved from the top. A
//! negated link stays on the chain with a no-op resolution and a record of
//! every card that negated it, so structurally every link still resolves.
//!
//! After each link resolves, a single-use card (normal or quick-play
//! program, normal or counter trap) that is still where it was activated
//! goes to its owner's scrapheap. Continuous recalculation runs once, when
//! the chain is empty.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

use crate::cards::Card;
use crate::core::{DuelEventKind, InstanceId, PlayerId};
use crate::effects::{recalculate, EffectContext, ExecutionSpeed, ResolveFn};
use crate::error::DuelError;
use crate::rules::Duel;
use crate::triggers::GameEvent;
use crate::zones::Location;

/// What a link does when it resolves.
#[derive(Clone, Copy, Debug)]
pub enum LinkResolution {
    Resolve(ResolveFn),
    /// Nothing: negated, or the effect has no resolve hook.
    NoOp,
}

/// One activated effect on the chain.
#[derive(Clone, Debug)]
pub struct ChainLink {
    pub card: InstanceId,
    /// Index into the card's effect list.
    pub effect: usize,
    pub controller: PlayerId,
    pub targets: SmallVec<[InstanceId; 2]>,
    pub speed: ExecutionSpeed,
    /// Where the card was when the link was created.
    pub location: Location,
    pub resolution: LinkResolution,
    /// Cards that negated this link, oldest first.
    pub negations: SmallVec<[InstanceId; 1]>,
    /// The event a trigger link answered.
    pub event: Option<GameEvent>,
}

impl ChainLink {
    #[must_use]
    pub fn is_negated(&self) -> bool {
        !self.negations.is_empty()
    }

    /// Replace the resolution with a no-op and record `source`.
    pub fn negate(&mut self, source: InstanceId) {
        self.resolution = LinkResolution::NoOp;
        self.negations.push(source);
    }

    /// Rebuild the context the effect was activated with.
    #[must_use]
    pub fn context(&self, index: usize) -> EffectContext {
        EffectContext {
            source: self.card,
            effect: self.effect,
            controller: self.controller,
            targets: self.targets.clone(),
            link: Some(index),
            event: self.event.clone(),
        }
    }
}

/// Links in activation order (index 0 = chain link 1).
#[derive(Clone, Debug, Default)]
pub struct Chain {
    links: Vec<ChainLink>,
}

impl Chain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link on top; returns its 0-based position.
    pub fn push(&mut self, link: ChainLink) -> usize {
        self.links.push(link);
        self.links.len() - 1
    }

    pub fn pop(&mut self) -> Option<ChainLink> {
        self.links.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&ChainLink> {
        self.links.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    #[must_use]
    pub fn link(&self, index: usize) -> Option<&ChainLink> {
        self.links.get(index)
    }

    pub fn link_mut(&mut self, index: usize) -> Option<&mut ChainLink> {
        self.links.get_mut(index)
    }
}

/// Summary of a negation, for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Negation {
    pub link: usize,
    pub source: InstanceId,
}

impl Duel {
    /// Put an activated effect on top of the chain, starting one if
    /// needed. Returns the link's 0-based position.
    pub(crate) fn push_link(&mut self, ctx: EffectContext, speed: ExecutionSpeed) -> Result<usize, DuelError> {
        let instance = self.state.card(ctx.source);
        let card: Arc<Card> = Arc::clone(&instance.card);
        let Some(effect) = card.effect(ctx.effect) else {
            return Err(DuelError::invariant(format!("{} has no effect {}", card.name, ctx.effect)));
        };
        let link = ChainLink {
            card: ctx.source,
            effect: ctx.effect,
            controller: ctx.controller,
            targets: ctx.targets,
            speed,
            location: instance.location,
            resolution: effect.hooks.resolve.map_or(LinkResolution::NoOp, LinkResolution::Resolve),
            negations: SmallVec::new(),
            event: ctx.event,
        };
        let index = self.state.chain.get_or_insert_with(Chain::new).push(link);
        self.emit(
            DuelEventKind::ChainLink,
            Some(ctx.controller),
            Some(ctx.source),
            Some(index as i32 + 1),
            format!("chain link {}: {}", index + 1, effect.label),
        );
        Ok(index)
    }

    /// Negate the link at `index`, optionally destroying its card.
    ///
    /// Negating an already negated link adds another negation source.
    pub fn negate_link(&mut self, index: usize, source: InstanceId, destroy: bool) -> Result<Negation, DuelError> {
        let Some(link) = self.state.chain.as_mut().and_then(|c| c.link_mut(index)) else {
            return Err(DuelError::invariant(format!("no chain link {}", index + 1)));
        };
        link.negate(source);
        let card = link.card;
        let controller = link.controller;
        let count = link.negations.len();
        self.emit(
            DuelEventKind::Negate,
            Some(controller),
            Some(card),
            Some(index as i32 + 1),
            format!("chain link {} negated ({count} negation(s))", index + 1),
        );
        if destroy {
            self.destroy(card, Some(source))?;
        }
        Ok(Negation { link: index, source })
    }

    /// Resolve the chain top-down, recalculate, then flush the events and
    /// triggers the chain produced.
    pub fn resolve_chain(&mut self) -> Result<(), DuelError> {
        loop {
            if self.state.is_over() {
                break;
            }
            let Some(link) = self.state.chain.as_mut().and_then(Chain::pop) else {
                break;
            };
            let index = self.state.chain_len();
            debug!(link = index + 1, card = %link.card, "resolving chain link");
            self.emit(
                DuelEventKind::ChainResolve,
                Some(link.controller),
                Some(link.card),
                Some(index as i32 + 1),
                if link.is_negated() {
                    format!("chain link {} resolves with no effect", index + 1)
                } else {
                    format!("chain link {} resolves", index + 1)
                },
            );
            if let LinkResolution::Resolve(resolve) = link.resolution {
                resolve(self, &link.context(index))?;
            }
            self.finish_link(&link)?;
        }

        self.state.chain = None;
        recalculate(&mut self.state);
        self.flush_events()?;
        Ok(())
    }

    fn finish_link(&mut self, link: &ChainLink) -> Result<(), DuelError> {
        if !self.state.is_at(link.card, link.location) {
            return Ok(());
        }
        let instance = self.state.card(link.card);
        let spent = instance.kind().is_single_use()
            || (instance.is_equip() && instance.equipped_to.is_none());
        if spent && instance.is_on_field() {
            self.send_to_scrapheap(link.card)?;
        }
        Ok(())
    }
}
