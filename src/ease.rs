/// Easing curves applied to transition progress before interpolation.
///
/// Pose-to-pose transitions use [`Ease::InOutCubic`] so limbs accelerate out
/// of the starting pose and settle into the target pose.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 3] = [Ease::Linear, Ease::OutCubic, Ease::InOutCubic];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn strictly_increasing_inside_the_interval() {
        for ease in ALL {
            let mut prev = ease.apply(0.0);
            for i in 1..=20 {
                let next = ease.apply(f64::from(i) / 20.0);
                assert!(next > prev, "{ease:?} not increasing at step {i}");
                prev = next;
            }
        }
    }
}
