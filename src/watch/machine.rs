// watch page source selection
//
// two independent places can give us something to play: an embed provider (someone else's player
// in a frame) and direct streams our own player can drive. embed is always tried first, an empty
// embed answer moves us to direct exactly once and never back on its own. everything here is a
// plain value in, value out transition so it can be tested without any http
use serde::{Deserialize, Serialize};

use crate::catalog::StreamSource;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    TryingEmbed,
    Embed,
    TryingDirect,
    Direct,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Embed,
    Direct,
}

impl Source {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "embed" | "showbox" => Some(Source::Embed),
            "direct" | "native" => Some(Source::Direct),
            _ => None,
        }
    }
}

/// what is being watched, season/episode are None for movies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WatchSubject {
    pub key: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    Start,
    EmbedLoaded(Vec<StreamSource>),
    EmbedFailed,
    DirectLoaded(Vec<StreamSource>),
    DirectFailed,
    SwitchSource(Source),
    Select(usize),
    SubjectChanged(WatchSubject),
    EpisodeChanged { season: Option<u32>, episode: Option<u32> },
    Retry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchState {
    pub subject: WatchSubject,
    pub phase: Phase,
    pub active: Source,
    /// None until the embed lookup finished, an empty Vec is a real "nothing found"
    pub embed_links: Option<Vec<StreamSource>>,
    pub direct_streams: Option<Vec<StreamSource>>,
    pub selected: usize,
    pub error: bool,
}

impl WatchState {
    pub fn new(subject: WatchSubject) -> Self {
        Self {
            subject,
            phase: Phase::Init,
            active: Source::Embed,
            embed_links: None,
            direct_streams: None,
            selected: 0,
            error: false,
        }
    }

    pub fn apply(self, event: WatchEvent) -> Self {
        match event {
            WatchEvent::Start => self.start(),
            WatchEvent::EmbedLoaded(links) => self.embed_loaded(links),
            WatchEvent::EmbedFailed => self.failed(Phase::TryingEmbed, Source::Embed),
            WatchEvent::DirectLoaded(streams) => self.direct_loaded(streams),
            WatchEvent::DirectFailed => self.failed(Phase::TryingDirect, Source::Direct),
            WatchEvent::SwitchSource(source) => self.switch(source),
            WatchEvent::Select(index) => self.select(index),
            WatchEvent::SubjectChanged(subject) => {
                if subject == self.subject {
                    self
                } else {
                    Self::new(subject).start()
                }
            }
            WatchEvent::EpisodeChanged { season, episode } => {
                if season == self.subject.season && episode == self.subject.episode {
                    return self;
                }
                let subject = WatchSubject {
                    key: self.subject.key.clone(),
                    season,
                    episode,
                };
                Self::new(subject).start()
            }
            WatchEvent::Retry => Self::new(self.subject).start(),
        }
    }

    /// which lookup the driver has to run next, None once the state has settled
    pub fn pending_lookup(&self) -> Option<Source> {
        match self.phase {
            Phase::TryingEmbed => Some(Source::Embed),
            Phase::TryingDirect => Some(Source::Direct),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_lookup().is_some()
    }

    pub fn active_list(&self) -> &[StreamSource] {
        let list = match self.active {
            Source::Embed => self.embed_links.as_deref(),
            Source::Direct => self.direct_streams.as_deref(),
        };
        list.unwrap_or(&[])
    }

    pub fn selected_source(&self) -> Option<&StreamSource> {
        match self.phase {
            Phase::Embed | Phase::Direct => self.active_list().get(self.selected),
            _ => None,
        }
    }

    fn start(mut self) -> Self {
        if self.phase == Phase::Init {
            self.phase = Phase::TryingEmbed;
            self.active = Source::Embed;
            self.error = false;
        }
        self
    }

    fn embed_loaded(mut self, links: Vec<StreamSource>) -> Self {
        // a late answer for a lookup we're no longer waiting on changes nothing
        if self.phase != Phase::TryingEmbed {
            return self;
        }

        self.selected = 0;
        self.error = false;

        if links.is_empty() {
            self.embed_links = Some(links);
            self.phase = Phase::TryingDirect;
            self.active = Source::Direct;
        } else {
            self.embed_links = Some(links);
            self.phase = Phase::Embed;
            self.active = Source::Embed;
        }
        self
    }

    fn direct_loaded(mut self, streams: Vec<StreamSource>) -> Self {
        if self.phase != Phase::TryingDirect {
            return self;
        }

        self.direct_streams = Some(streams);
        self.phase = Phase::Direct;
        self.active = Source::Direct;
        self.selected = 0;
        self.error = false;
        self
    }

    fn failed(mut self, expected: Phase, source: Source) -> Self {
        if self.phase != expected {
            return self;
        }

        self.phase = Phase::Failed;
        self.active = source;
        self.error = true;
        self
    }

    fn switch(mut self, source: Source) -> Self {
        match source {
            Source::Embed => {
                // no refetch on a manual switch, embed needs something already loaded
                let has_links = self.embed_links.as_ref().is_some_and(|l| !l.is_empty());
                if !has_links || self.phase == Phase::Embed {
                    return self;
                }
                self.phase = Phase::Embed;
            }
            Source::Direct => {
                if matches!(self.phase, Phase::Direct | Phase::TryingDirect) {
                    return self;
                }
                self.phase = if self.direct_streams.is_some() {
                    Phase::Direct
                } else {
                    Phase::TryingDirect
                };
            }
        }

        self.active = source;
        self.selected = 0;
        self.error = false;
        self
    }

    fn select(mut self, index: usize) -> Self {
        let settled = matches!(self.phase, Phase::Embed | Phase::Direct);
        if settled && index < self.active_list().len() {
            self.selected = index;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed(n: usize) -> Vec<StreamSource> {
        (0..n)
            .map(|i| StreamSource::Embed {
                provider: format!("provider{}", i),
                url: format!("https://embed/{}", i),
                quality: "1080".to_string(),
            })
            .collect()
    }

    fn direct(n: usize) -> Vec<StreamSource> {
        (0..n)
            .map(|i| StreamSource::Direct {
                format: "MP4".to_string(),
                resolution: "720".to_string(),
                size: "1000".to_string(),
                duration: 5400,
                codec: "h264".to_string(),
                url: format!("https://cdn/{}.mp4", i),
            })
            .collect()
    }

    fn subject(key: &str) -> WatchSubject {
        WatchSubject {
            key: key.to_string(),
            season: None,
            episode: None,
        }
    }

    fn started() -> WatchState {
        WatchState::new(subject("dune")).apply(WatchEvent::Start)
    }

    #[test]
    fn test_starts_by_trying_embed() {
        let state = started();
        assert_eq!(state.phase, Phase::TryingEmbed);
        assert_eq!(state.pending_lookup(), Some(Source::Embed));
    }

    #[test]
    fn test_empty_embed_falls_back_to_direct() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(vec![]))
            .apply(WatchEvent::DirectLoaded(direct(2)));

        assert_eq!(state.phase, Phase::Direct);
        assert_eq!(state.active, Source::Direct);
        assert!(!state.error);
    }

    #[test]
    fn test_empty_direct_still_ends_in_direct() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(vec![]))
            .apply(WatchEvent::DirectLoaded(vec![]));

        assert_eq!(state.phase, Phase::Direct);
        assert!(state.selected_source().is_none());
    }

    #[test]
    fn test_late_embed_result_does_not_reverse_fallback() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(vec![]))
            .apply(WatchEvent::DirectLoaded(direct(1)))
            .apply(WatchEvent::EmbedLoaded(embed(3)));

        assert_eq!(state.phase, Phase::Direct);
        assert_eq!(state.embed_links, Some(vec![]));
    }

    #[test]
    fn test_switch_to_empty_embed_is_noop() {
        let before = started()
            .apply(WatchEvent::EmbedLoaded(vec![]))
            .apply(WatchEvent::DirectLoaded(direct(2)))
            .apply(WatchEvent::Select(1));

        let after = before.clone().apply(WatchEvent::SwitchSource(Source::Embed));

        assert_eq!(before, after);
    }

    #[test]
    fn test_switch_to_embed_before_it_loaded_is_noop() {
        let before = started();
        let after = before.clone().apply(WatchEvent::SwitchSource(Source::Embed));
        assert_eq!(before, after);
    }

    #[test]
    fn test_switch_between_loaded_sources_resets_selection() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(embed(3)))
            .apply(WatchEvent::Select(2))
            .apply(WatchEvent::SwitchSource(Source::Direct));

        assert_eq!(state.phase, Phase::TryingDirect);
        assert_eq!(state.selected, 0);

        let state = state
            .apply(WatchEvent::DirectLoaded(direct(2)))
            .apply(WatchEvent::SwitchSource(Source::Embed));

        assert_eq!(state.phase, Phase::Embed);
        assert_eq!(state.active_list().len(), 3);

        // direct is already loaded, no second lookup
        let state = state.apply(WatchEvent::SwitchSource(Source::Direct));
        assert_eq!(state.phase, Phase::Direct);
    }

    #[test]
    fn test_failure_sets_error_not_loading() {
        let state = started().apply(WatchEvent::EmbedFailed);

        assert_eq!(state.phase, Phase::Failed);
        assert!(state.error);
        assert!(!state.is_loading());
        assert_eq!(state.embed_links, None);
    }

    #[test]
    fn test_manual_switch_out_of_failure_clears_error() {
        let state = started()
            .apply(WatchEvent::EmbedFailed)
            .apply(WatchEvent::SwitchSource(Source::Direct));

        assert_eq!(state.phase, Phase::TryingDirect);
        assert!(!state.error);
    }

    #[test]
    fn test_retry_restarts_from_embed() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(vec![]))
            .apply(WatchEvent::DirectFailed)
            .apply(WatchEvent::Retry);

        assert_eq!(state.phase, Phase::TryingEmbed);
        assert!(!state.error);
        assert_eq!(state.direct_streams, None);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(embed(2)))
            .apply(WatchEvent::Select(5));

        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_subject_change_resets_selection() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(embed(4)))
            .apply(WatchEvent::Select(3))
            .apply(WatchEvent::SubjectChanged(subject("arrival")));

        assert_eq!(state.selected, 0);
        assert_eq!(state.phase, Phase::TryingEmbed);
        assert_eq!(state.subject.key, "arrival");
        assert_eq!(state.embed_links, None);
    }

    #[test]
    fn test_same_subject_keeps_selection() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(embed(4)))
            .apply(WatchEvent::Select(3))
            .apply(WatchEvent::SubjectChanged(subject("dune")));

        assert_eq!(state.selected, 3);
    }

    #[test]
    fn test_episode_change_resets_selection() {
        let state = started()
            .apply(WatchEvent::EmbedLoaded(embed(4)))
            .apply(WatchEvent::Select(2))
            .apply(WatchEvent::EpisodeChanged {
                season: Some(1),
                episode: Some(2),
            });

        assert_eq!(state.selected, 0);
        assert_eq!(state.subject.key, "dune");
        assert_eq!(state.subject.episode, Some(2));
        assert_eq!(state.phase, Phase::TryingEmbed);
    }
}
