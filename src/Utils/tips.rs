//! Study tips shown by the UI between computations. Pure flavor: a static
//! lookup table indexed by a uniformly drawn index.

use rand::Rng;

pub const TIPS: &[&str] = &[
    "Bisection always converges on a valid bracket, it is just slow: one binary digit per iteration.",
    "Newton-Raphson squares its error near the root, but a flat tangent sends it to the horizon.",
    "The secant method trades the derivative for a second starting point.",
    "Doubling the trapezoid count roughly quarters the integration error.",
    "After 5 time constants an RC capacitor is above 99% of its final charge.",
    "A huge condition number means tiny input noise becomes large solution noise.",
    "Interpolation must pass through every point; regression only follows the trend.",
    "Write x**2 for powers. The caret means something else entirely.",
];

pub fn random_tip() -> &'static str {
    let mut rng = rand::rng();
    TIPS[rng.random_range(0..TIPS.len())]
}
