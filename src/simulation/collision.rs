//! Contact detection and response between bodies
//!
//! Shapes are centred on the body position. Touching edges count as a
//! contact. The response is picked per scenario by [`CollisionConfig`]

use tracing::debug;

use crate::configuration::config::CollisionConfig;
use crate::simulation::states::{Body, Bounds, System, NVec2};

/// Pair of bodies (by id) found touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: u32,
    pub b: u32,
    pub absorbed: Option<u32>, // id removed by a merge
}

/// Inclusive interval overlap on one axis
fn overlaps(ca: f64, ha: f64, cb: f64, hb: f64) -> bool {
    (ca - cb).abs() <= ha + hb
}

fn box_circle(bx: NVec2, w: f64, h: f64, cx: NVec2, r: f64) -> bool {
    // closest point of the box to the circle centre
    let half = NVec2::new(0.5 * w, 0.5 * h);
    let d = cx - bx;
    let closest = NVec2::new(d.x.clamp(-half.x, half.x), d.y.clamp(-half.y, half.y));
    (d - closest).norm_squared() <= r * r
}

/// True if the bounds of `a` and `b` touch or overlap
pub fn intersects(a: &Body, b: &Body) -> bool {
    match (a.bounds, b.bounds) {
        (Bounds::Box { w: wa, h: ha }, Bounds::Box { w: wb, h: hb }) => {
            overlaps(a.x.x, 0.5 * wa, b.x.x, 0.5 * wb) && overlaps(a.x.y, 0.5 * ha, b.x.y, 0.5 * hb)
        }
        (Bounds::Circle { r: ra }, Bounds::Circle { r: rb }) => {
            (b.x - a.x).norm_squared() <= (ra + rb) * (ra + rb)
        }
        (Bounds::Box { w, h }, Bounds::Circle { r }) => box_circle(a.x, w, h, b.x, r),
        (Bounds::Circle { r }, Bounds::Box { w, h }) => box_circle(b.x, w, h, a.x, r),
    }
}

/// Absorb `gone` into `keep`: mass and momentum are conserved, the position
/// moves to the centre of mass and the area of both shapes is added up
fn absorb(keep: &mut Body, gone: &Body) {
    let m = keep.m + gone.m;
    let momentum = keep.m * keep.v + gone.m * gone.v;
    keep.x = (keep.m * keep.x + gone.m * gone.x) / m;
    keep.v = momentum / m;
    keep.a = NVec2::zeros();
    keep.f = NVec2::zeros();
    keep.thrust += gone.thrust;

    let area = keep.bounds.area();
    if area > 0.0 {
        let k = ((area + gone.bounds.area()) / area).sqrt();
        keep.bounds = keep.bounds.scaled(k);
    }
    keep.m = m;
}

/// Find the first touching pair (i < j) in the system
fn first_contact(sys: &System) -> Option<(usize, usize)> {
    let n = sys.bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if intersects(&sys.bodies[i], &sys.bodies[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Detect every touching pair and apply `response` to it
/// Returns the contacts handled during this call
pub fn resolve_collisions(sys: &mut System, response: CollisionConfig) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let n = sys.bodies.len();

    match response {
        CollisionConfig::Halt | CollisionConfig::Ignore => {
            for i in 0..n {
                for j in (i + 1)..n {
                    if !intersects(&sys.bodies[i], &sys.bodies[j]) {
                        continue;
                    }
                    contacts.push(Contact { a: sys.bodies[i].id, b: sys.bodies[j].id, absorbed: None });
                    if response == CollisionConfig::Halt {
                        for k in [i, j] {
                            sys.bodies[k].v = NVec2::zeros();
                            sys.bodies[k].a = NVec2::zeros();
                        }
                    }
                }
            }
        }
        CollisionConfig::Merge => {
            // each merge removes a body, so this terminates after at most n - 1 passes
            while let Some((i, j)) = first_contact(sys) {
                let (bi, bj) = (&sys.bodies[i], &sys.bodies[j]);

                // heavier body survives, lower id on a tie
                let keep_i = bi.m > bj.m || (bi.m == bj.m && bi.id < bj.id);
                let (keep, gone) = if keep_i { (i, j) } else { (j, i) };
                contacts.push(Contact { a: bi.id, b: bj.id, absorbed: Some(sys.bodies[gone].id) });

                let gone_body = sys.bodies.remove(gone);
                let keep = if gone < keep { keep - 1 } else { keep };
                debug!(keep = sys.bodies[keep].id, gone = gone_body.id, "merging bodies");
                absorb(&mut sys.bodies[keep], &gone_body);
            }
        }
    }

    for c in &contacts {
        debug!(a = c.a, b = c.b, t = sys.t, ?response, "collision");
    }

    contacts
}
