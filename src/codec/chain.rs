use super::CodecInstance;
use std::collections::{vec_deque, VecDeque};
use tracing::{info, trace};

/// An ordered set of opened codecs, fed to a pipeline in sequence.
///
/// The chain owns every instance linked into it. Instances leave only by
/// destruction, from the head: [`destroy_head`] for one, [`destroy_all`]
/// (or dropping the chain) for the rest. Either way each backend is released
/// once, oldest first.
///
/// A chain is not shared: each pipeline keeps its own, mutated through `&mut`.
///
/// [`destroy_head`]: CodecChain::destroy_head
/// [`destroy_all`]: CodecChain::destroy_all
#[derive(Debug, Default)]
pub struct CodecChain {
    codecs: VecDeque<CodecInstance>,
}

impl CodecChain {
    /// Create a new, empty, chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: VecDeque::new(),
        }
    }

    /// Links `codec` in after the current tail.
    pub fn append(&mut self, codec: CodecInstance) {
        trace!(
            "Codec appended to chain: {} on {:?}.",
            codec.info().type_name,
            codec.info().path
        );
        self.codecs.push_back(codec);
    }

    /// Unlinks and destroys the head of the chain, if any.
    pub fn destroy_head(&mut self) {
        if let Some(head) = self.codecs.pop_front() {
            info!(
                "Destroying chain head: {} on {:?}; {} codecs remain.",
                head.info().type_name,
                head.info().path,
                self.codecs.len()
            );
            head.destroy();
        }
    }

    /// Destroys every codec in the chain, head first.
    pub fn destroy_all(&mut self) {
        while !self.codecs.is_empty() {
            self.destroy_head();
        }
    }

    /// Returns the oldest codec in the chain.
    #[must_use]
    pub fn head(&self) -> Option<&CodecInstance> {
        self.codecs.front()
    }

    /// Returns a mutable reference to the oldest codec in the chain.
    pub fn head_mut(&mut self) -> Option<&mut CodecInstance> {
        self.codecs.front_mut()
    }

    /// Returns the most recently appended codec.
    #[must_use]
    pub fn tail(&self) -> Option<&CodecInstance> {
        self.codecs.back()
    }

    /// Returns a mutable reference to the most recently appended codec.
    pub fn tail_mut(&mut self) -> Option<&mut CodecInstance> {
        self.codecs.back_mut()
    }

    /// Returns the number of codecs in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Returns whether the chain holds no codecs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Iterates over the chain from head to tail.
    pub fn iter(&self) -> vec_deque::Iter<'_, CodecInstance> {
        self.codecs.iter()
    }

    /// Mutably iterates over the chain from head to tail.
    pub fn iter_mut(&mut self) -> vec_deque::IterMut<'_, CodecInstance> {
        self.codecs.iter_mut()
    }
}

impl<'a> IntoIterator for &'a CodecChain {
    type IntoIter = vec_deque::Iter<'a, CodecInstance>;
    type Item = &'a CodecInstance;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Drop for CodecChain {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::Mode,
        test_utils::{fake_instance, CallLog},
    };

    fn chain_of(log: &CallLog, names: &[&str]) -> CodecChain {
        let mut chain = CodecChain::new();
        for name in names {
            chain.append(fake_instance(log, name, Mode::Read));
        }
        chain
    }

    #[test]
    fn append_preserves_insertion_order() {
        let log = CallLog::default();
        let chain = chain_of(&log, &["i1", "i2", "i3"]);

        let order: Vec<_> = chain.iter().map(|c| c.info().path.as_str()).collect();
        assert_eq!(order, vec!["i1", "i2", "i3"]);
        assert_eq!(chain.head().map(|c| c.info().path.as_str()), Some("i1"));
        assert_eq!(chain.tail().map(|c| c.info().path.as_str()), Some("i3"));
        assert!(log.releases().is_empty());
    }

    #[test]
    fn destroy_head_is_fifo() {
        let log = CallLog::default();
        let mut chain = chain_of(&log, &["i1", "i2", "i3"]);

        chain.destroy_head();
        assert_eq!(log.releases(), vec!["i1"]);
        assert_eq!(chain.head().map(|c| c.info().path.as_str()), Some("i2"));

        chain.destroy_head();
        chain.destroy_head();
        assert_eq!(log.releases(), vec!["i1", "i2", "i3"]);
        assert!(chain.is_empty());
        assert!(chain.head().is_none());
        assert!(chain.tail().is_none());
    }

    #[test]
    fn destroy_head_on_single_element_empties_both_ends() {
        let log = CallLog::default();
        let mut chain = chain_of(&log, &["only"]);

        chain.destroy_head();

        assert!(chain.head().is_none());
        assert!(chain.tail().is_none());
        assert_eq!(log.releases(), vec!["only"]);

        chain.append(fake_instance(&log, "next", Mode::Read));
        assert_eq!(chain.head().map(|c| c.info().path.as_str()), Some("next"));
        assert_eq!(chain.tail().map(|c| c.info().path.as_str()), Some("next"));
    }

    #[test]
    fn destroy_all_releases_each_exactly_once() {
        let log = CallLog::default();
        let mut chain = chain_of(&log, &["a", "b", "c", "d"]);

        chain.destroy_all();

        assert_eq!(log.releases(), vec!["a", "b", "c", "d"]);
        assert!(chain.is_empty());

        drop(chain);
        assert_eq!(log.releases().len(), 4);
    }

    #[test]
    fn empty_teardown_is_a_noop() {
        let mut chain = CodecChain::new();

        chain.destroy_head();
        chain.destroy_all();
        chain.destroy_all();

        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn dropping_chain_destroys_in_order() {
        let log = CallLog::default();
        {
            let _chain = chain_of(&log, &["x", "y"]);
        }

        assert_eq!(log.releases(), vec!["x", "y"]);
    }

    #[test]
    fn failing_release_does_not_stop_teardown() {
        let log = CallLog::default();
        let mut chain = CodecChain::new();
        chain.append(fake_instance(&log, "ok", Mode::Read));
        chain.append(crate::test_utils::failing_release_instance(&log, "bad"));
        chain.append(fake_instance(&log, "after", Mode::Read));

        chain.destroy_all();

        assert_eq!(log.releases(), vec!["ok", "bad", "after"]);
        assert!(chain.is_empty());
    }
}
