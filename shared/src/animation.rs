/*!
Animation clip switch.

Tracks named clip actions and which one is current. Only the clip clock lives here;
sampling bone transforms is left to the renderer, which reads `ClipAction::time()`.
*/

/// Metadata of a loaded clip, supplied by the asset loader.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
    pub track_count: usize,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration: f32, track_count: usize) -> Self {
        Self {
            name: name.into(),
            duration,
            track_count,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    #[default]
    Repeat,
}

/// Outcome of [`Animator::play_clip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    AlreadyPlaying,
    Missing,
}

/// Playback state of one registered clip.
#[derive(Clone, Debug)]
pub struct ClipAction {
    info: ClipInfo,
    loop_mode: LoopMode,
    time: f32,
    weight: f32,
    time_scale: f32,
    enabled: bool,
    running: bool,
}

impl ClipAction {
    fn new(info: ClipInfo, loop_mode: LoopMode) -> Self {
        Self {
            info,
            loop_mode,
            time: 0.0,
            weight: 0.0,
            time_scale: 1.0,
            enabled: false,
            running: false,
        }
    }

    #[inline]
    pub fn info(&self) -> &ClipInfo {
        &self.info
    }

    /// Local clip time in seconds, always within `[0, duration]`.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        self.running = false;
        self.enabled = false;
        self.weight = 0.0;
        self.time = 0.0;
    }

    fn start(&mut self) {
        self.time = 0.0;
        self.weight = 1.0;
        self.time_scale = 1.0;
        self.enabled = true;
        self.running = true;
    }

    fn advance(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let duration = self.info.duration;
        if !(duration.is_finite() && duration > 0.0) {
            self.time = 0.0;
            return;
        }

        let time = self.time + dt * self.time_scale;
        match self.loop_mode {
            LoopMode::Repeat => self.time = time.rem_euclid(duration),
            LoopMode::Once => {
                if time >= duration {
                    self.time = duration;
                    self.running = false;
                } else {
                    self.time = time.max(0.0);
                }
            }
        }
    }
}

/// Named clip actions with at most one current clip.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    actions: Vec<ClipAction>,
    current: Option<usize>,
}

impl Animator {
    /// Make a clip available for playback. Re-registering a name replaces its metadata.
    pub fn register_clip(&mut self, info: ClipInfo, loop_mode: LoopMode) {
        log::info!("Clip configured: {} ({} tracks)", info.name, info.track_count);

        match self.find(&info.name) {
            Some(idx) => {
                let action = &mut self.actions[idx];
                action.info = info;
                action.loop_mode = loop_mode;
            }
            None => self.actions.push(ClipAction::new(info, loop_mode)),
        }
    }

    /// Switch the current clip.
    ///
    /// - Unknown name: nothing changes, the miss is logged.
    /// - Name already current: no-op, the clip keeps its time.
    /// - Otherwise the previous clip is stopped and reset, and the new one restarts from 0
    ///   with full weight and unit time scale.
    pub fn play_clip(&mut self, name: &str) -> PlayOutcome {
        let Some(next) = self.find(name) else {
            log::warn!("Animation clip not found: {name}");
            return PlayOutcome::Missing;
        };
        if self.current == Some(next) {
            return PlayOutcome::AlreadyPlaying;
        }

        if let Some(prev) = self.current {
            self.actions[prev].stop();
        }
        self.actions[next].start();
        self.current = Some(next);

        log::debug!("Playing clip {name}");
        PlayOutcome::Started
    }

    /// Advance the running clip clock by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if let Some(idx) = self.current {
            self.actions[idx].advance(dt);
        }
    }

    /// The current clip, if any.
    pub fn current(&self) -> Option<&ClipAction> {
        self.current.map(|idx| &self.actions[idx])
    }

    pub fn action(&self, name: &str) -> Option<&ClipAction> {
        self.find(name).map(|idx| &self.actions[idx])
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.info.name == name)
    }
}
