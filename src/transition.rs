use crate::core::Vec3;
use crate::ease::Ease;
use crate::error::{PanelError, PanelResult};
use crate::expression::{
    BlendWeights, ExpressionDefinition, NEUTRAL_EXPRESSION, resolve_expression_or_neutral,
};
use crate::pose::{NEUTRAL_POSE, PoseDefinition, resolve_pose_or_neutral};
use crate::skeleton::{Skeleton, SkeletonState};

/// Default step count for pose/expression transitions.
pub const DEFAULT_TRANSITION_STEPS: usize = 24;

/// Look target used as the interpolation origin/terminus when only one side
/// of a transition defines one.
const REST_LOOK_AT: Vec3 = Vec3::new(0.0, 1.5, 1.0);

/// Produce `steps + 1` skeleton states interpolating `from` into `to`.
///
/// Progress is eased with [`Ease::InOutCubic`] before component-wise linear
/// interpolation, so every interpolated scalar moves monotonically from its
/// `from` value to its `to` value. Bones named by only one definition
/// interpolate against the rest (identity) transform.
pub fn pose_transition(
    skeleton: &Skeleton,
    from: &PoseDefinition,
    to: &PoseDefinition,
    steps: usize,
) -> PanelResult<Vec<SkeletonState>> {
    if steps == 0 {
        return Err(PanelError::validation("transition steps must be >= 1"));
    }

    let mut start = SkeletonState::rest(skeleton);
    start.apply_pose(skeleton, from);
    let mut end = SkeletonState::rest(skeleton);
    end.apply_pose(skeleton, to);

    let mut out = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let e = Ease::InOutCubic.apply(t);
        out.push(lerp_states(&start, &end, e));
    }
    Ok(out)
}

fn lerp_states(a: &SkeletonState, b: &SkeletonState, t: f64) -> SkeletonState {
    let transforms = a
        .transforms
        .iter()
        .zip(&b.transforms)
        .map(|(ta, tb)| crate::skeleton::BoneState {
            rotation: Vec3::lerp(ta.rotation, tb.rotation, t),
            position: Vec3::lerp(ta.position, tb.position, t),
        })
        .collect();

    let look_at = match (a.look_at, b.look_at) {
        (None, None) => None,
        (la, lb) => Some(Vec3::lerp(
            la.unwrap_or(REST_LOOK_AT),
            lb.unwrap_or(REST_LOOK_AT),
            t,
        )),
    };

    SkeletonState {
        transforms,
        look_at,
        weight: a.weight + (b.weight - a.weight) * t,
    }
}

/// Interpolate two expressions over the union of their blend channels,
/// channels missing from either side defaulting to 0. Returns `steps + 1`
/// weight maps with the same easing as [`pose_transition`].
pub fn expression_transition(
    from: &ExpressionDefinition,
    to: &ExpressionDefinition,
    steps: usize,
) -> PanelResult<Vec<BlendWeights>> {
    if steps == 0 {
        return Err(PanelError::validation("transition steps must be >= 1"));
    }

    let channels: Vec<_> = from
        .channels()
        .keys()
        .chain(to.channels().keys())
        .copied()
        .collect();

    let mut out = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let e = Ease::InOutCubic.apply(t);
        let mut weights = BlendWeights::new();
        for &c in &channels {
            let a = from.weight(c);
            let b = to.weight(c);
            weights.insert(c, a + (b - a) * e);
        }
        out.push(weights);
    }
    Ok(out)
}

/// Step-wise view over a finished transition, for callers that want to
/// observe intermediate frames (e.g. a live preview). Every state is complete
/// and independently valid, so abandoning the player mid-way needs no
/// cleanup.
#[derive(Clone, Debug)]
pub struct TransitionPlayer {
    states: Vec<SkeletonState>,
    cursor: usize,
}

impl TransitionPlayer {
    pub fn new(states: Vec<SkeletonState>) -> Self {
        Self { states, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.states.len().saturating_sub(self.cursor)
    }

    pub fn states(&self) -> &[SkeletonState] {
        &self.states
    }
}

impl Iterator for TransitionPlayer {
    type Item = SkeletonState;

    fn next(&mut self) -> Option<SkeletonState> {
        let state = self.states.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(state)
    }
}

/// Caller-owned pose/expression session. There is no global "current pose";
/// each panel render owns one of these for exactly one panel.
#[derive(Clone, Debug)]
pub struct PoseSession {
    pub skeleton: Skeleton,
    pub state: SkeletonState,
    pub pose: String,
    pub expression: String,
    pub weights: BlendWeights,
}

impl PoseSession {
    pub fn new() -> Self {
        let skeleton = Skeleton::humanoid();
        let state = SkeletonState::rest(&skeleton);
        Self {
            skeleton,
            state,
            pose: NEUTRAL_POSE.to_string(),
            expression: NEUTRAL_EXPRESSION.to_string(),
            weights: BlendWeights::new(),
        }
    }

    /// Apply a named pose immediately. Unknown names fall back to neutral
    /// with a warning; returns whether the requested name resolved.
    pub fn set_pose(&mut self, name: &str) -> bool {
        let (resolved, def) = resolve_pose_or_neutral(name);
        self.state.apply_pose(&self.skeleton, def);
        self.pose = resolved.to_string();
        resolved != NEUTRAL_POSE || name.trim().eq_ignore_ascii_case(NEUTRAL_POSE)
    }

    /// Apply a named expression immediately, with the same fallback contract
    /// as [`PoseSession::set_pose`].
    pub fn set_expression(&mut self, name: &str) -> bool {
        let (resolved, def) = resolve_expression_or_neutral(name);
        self.weights = def.channels().clone();
        self.expression = resolved.to_string();
        resolved != NEUTRAL_EXPRESSION || name.trim().eq_ignore_ascii_case(NEUTRAL_EXPRESSION)
    }

    /// Build a transition from the session's current pose to `name`, leave
    /// the session resting in the target pose, and return a player over the
    /// intermediate states.
    pub fn transition_to(&mut self, name: &str, steps: usize) -> PanelResult<TransitionPlayer> {
        let (_, from) = resolve_pose_or_neutral(&self.pose);
        let (resolved, to) = resolve_pose_or_neutral(name);
        let states = pose_transition(&self.skeleton, from, to, steps)?;
        if let Some(last) = states.last() {
            self.state = last.clone();
        }
        self.pose = resolved.to_string();
        Ok(TransitionPlayer::new(states))
    }
}

impl Default for PoseSession {
    fn default() -> Self {
        Self::new()
    }
}
