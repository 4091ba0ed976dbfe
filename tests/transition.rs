use panelforge::pose::resolve_pose;
use panelforge::skeleton::{BoneName, Skeleton, SkeletonState};
use panelforge::{PoseSession, expression_transition, pose_transition};

#[test]
fn standing_to_sitting_hip_angle_rises_monotonically() {
    let skeleton = Skeleton::humanoid();
    let from = resolve_pose("standing").unwrap();
    let to = resolve_pose("sitting").unwrap();
    let states = pose_transition(&skeleton, from, to, 30).unwrap();
    assert_eq!(states.len(), 31);

    let hip = |s: &SkeletonState| {
        s.rotation_of(&skeleton, BoneName::UpperLegLeft)
            .unwrap()
            .x
    };
    assert_eq!(hip(&states[0]), 0.0);
    assert!((hip(&states[30]) - 1.45).abs() < 1e-12);
    for pair in states.windows(2) {
        assert!(
            hip(&pair[1]) >= hip(&pair[0]),
            "hip angle regressed mid-transition"
        );
    }
}

#[test]
fn transition_endpoints_equal_applied_poses() {
    let skeleton = Skeleton::humanoid();
    let from = resolve_pose("waving").unwrap();
    let to = resolve_pose("thinking").unwrap();
    let states = pose_transition(&skeleton, from, to, 12).unwrap();

    let mut expected_start = SkeletonState::rest(&skeleton);
    expected_start.apply_pose(&skeleton, from);
    let mut expected_end = SkeletonState::rest(&skeleton);
    expected_end.apply_pose(&skeleton, to);

    let close = |a: &SkeletonState, b: &SkeletonState| {
        a.transforms.iter().zip(&b.transforms).all(|(ta, tb)| {
            (ta.rotation.x - tb.rotation.x).abs() < 1e-12
                && (ta.position.y - tb.position.y).abs() < 1e-12
        })
    };
    assert!(close(&states[0], &expected_start));
    assert!(close(&states[12], &expected_end));
}

#[test]
fn eased_progress_is_slow_at_both_ends() {
    let skeleton = Skeleton::humanoid();
    let from = resolve_pose("standing").unwrap();
    let to = resolve_pose("sitting").unwrap();
    let states = pose_transition(&skeleton, from, to, 10).unwrap();

    let hip = |s: &SkeletonState| {
        s.rotation_of(&skeleton, BoneName::UpperLegLeft)
            .unwrap()
            .x
    };
    let first_step = hip(&states[1]) - hip(&states[0]);
    let mid_step = hip(&states[6]) - hip(&states[5]);
    assert!(mid_step > first_step * 2.0);
}

#[test]
fn root_offset_interpolates_with_the_rotations() {
    let skeleton = Skeleton::humanoid();
    let from = resolve_pose("standing").unwrap();
    let to = resolve_pose("sitting").unwrap();
    let states = pose_transition(&skeleton, from, to, 8).unwrap();

    let spine = skeleton.index_of(BoneName::Spine).unwrap();
    let start_y = states[0].transforms[spine].position.y;
    let end_y = states[8].transforms[spine].position.y;
    assert_eq!(start_y, 0.0);
    assert!((end_y - (-0.42)).abs() < 1e-12);
    let mid_y = states[4].transforms[spine].position.y;
    assert!(mid_y < start_y && mid_y > end_y);
}

#[test]
fn session_transition_survives_unknown_target() {
    let mut session = PoseSession::new();
    session.set_pose("standing");
    let player = session.transition_to("cartwheel", 6).unwrap();
    // Unknown targets fall back to neutral rather than failing.
    assert_eq!(session.pose, "neutral");
    assert_eq!(player.states().len(), 7);
}

#[test]
fn expression_transition_endpoints_and_union() {
    use panelforge::BlendChannel;
    let happy = panelforge::expression::resolve_expression("happy").unwrap();
    let sad = panelforge::expression::resolve_expression("sad").unwrap();
    let frames = expression_transition(happy, sad, 30).unwrap();
    assert_eq!(frames.len(), 31);

    assert!((frames[0][&BlendChannel::MouthSmile] - 0.9).abs() < 1e-12);
    assert!(frames[30][&BlendChannel::MouthSmile].abs() < 1e-12);
    assert_eq!(frames[0][&BlendChannel::MouthFrown], 0.0);
    assert!((frames[30][&BlendChannel::MouthFrown] - 0.8).abs() < 1e-12);

    for frame in &frames {
        for weight in frame.values() {
            assert!((0.0..=1.0).contains(weight));
        }
    }
}
