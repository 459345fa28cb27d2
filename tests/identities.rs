//! Discrete vector calculus identities on arbitrary fields.

use proptest::prelude::*;
use stagger::{
    inner::{dot, norm},
    na,
    operator::{curl_of_nodes, divergence, gradient, laplacian, rot, translate},
    CellData, EdgeData, NodeData, Operand,
};

const NX: usize = 7;
const NY: usize = 5;

fn arbitrary<F: Operand + std::fmt::Debug>() -> impl Strategy<Value = F> {
    prop::collection::vec(-10.0f64..10.0, F::len())
        .prop_map(|v| F::from_vector(na::DVector::from_vec(v)))
}

fn cells() -> impl Strategy<Value = CellData<NX, NY>> {
    arbitrary()
}

fn edges() -> impl Strategy<Value = EdgeData<NX, NY>> {
    arbitrary()
}

fn nodes() -> impl Strategy<Value = NodeData<NX, NY>> {
    arbitrary()
}

/// Zero the boundary fluxes and ghost slots of edge data.
fn mask_edges(mut q: EdgeData<NX, NY>) -> EdgeData<NX, NY> {
    for j in 0..NY + 2 {
        q.x[(0, j)] = 0.0;
        q.x[(NX, j)] = 0.0;
    }
    for i in 0..=NX {
        q.x[(i, 0)] = 0.0;
        q.x[(i, NY + 1)] = 0.0;
    }
    for i in 0..NX + 2 {
        q.y[(i, 0)] = 0.0;
        q.y[(i, NY)] = 0.0;
    }
    for j in 0..=NY {
        q.y[(0, j)] = 0.0;
        q.y[(NX + 1, j)] = 0.0;
    }
    q
}

fn mask_nodes(mut s: NodeData<NX, NY>) -> NodeData<NX, NY> {
    for i in 0..=NX {
        for j in 0..=NY {
            if NodeData::<NX, NY>::is_boundary(i, j) {
                s[(i, j)] = 0.0;
            }
        }
    }
    s
}

/// Max-norm over all stored values, ghosts included.
fn amax_cells(p: &CellData<NX, NY>) -> f64 {
    p.values.amax()
}

proptest! {
    #[test]
    fn divergence_of_curl_vanishes(s in nodes()) {
        let div_curl = divergence(&curl_of_nodes(&s));
        prop_assert!(norm(&div_curl) <= 1e-13 * norm(&s).max(1.0));
    }

    #[test]
    fn rot_of_gradient_vanishes(p in cells()) {
        let rot_grad = rot(&gradient(&p));
        prop_assert!(norm(&rot_grad) <= 1e-13 * amax_cells(&p).max(1.0));
    }

    #[test]
    fn laplacian_is_divergence_of_gradient(p in cells()) {
        let diff = laplacian(&p) - divergence(&gradient(&p));
        prop_assert!(norm(&diff) <= 1e-13 * amax_cells(&p).max(1.0));
    }

    #[test]
    fn gradient_is_negative_adjoint_of_divergence(q in edges(), p in cells()) {
        let q = mask_edges(q);
        let lhs = dot(&divergence(&q), &p);
        let rhs = -dot(&q, &gradient(&p));
        prop_assert!((lhs - rhs).abs() <= 1e-10 * (1.0 + lhs.abs()));
    }

    #[test]
    fn curl_is_adjoint_of_rot(q in edges(), s in nodes()) {
        let q = mask_edges(q);
        let s = mask_nodes(s);
        let lhs = dot(&rot(&q), &s);
        let rhs = dot(&q, &curl_of_nodes(&s));
        prop_assert!((lhs - rhs).abs() <= 1e-10 * (1.0 + lhs.abs()));
    }

    #[test]
    fn negation_is_involutive(p in cells(), q in edges(), s in nodes()) {
        prop_assert_eq!(-(-&p), p.clone());
        prop_assert_eq!(-(-&q), q.clone());
        prop_assert_eq!(-(-&s), s.clone());

        let mut p2 = p.clone();
        p2.negate().negate();
        prop_assert_eq!(p2, p);
    }

    #[test]
    fn scalar_arithmetic_is_consistent(p in cells(), a in -5.0f64..5.0) {
        prop_assert_eq!(&p * 1.0, p.clone());
        prop_assert_eq!(a * &p, &p * a);
        prop_assert_eq!(norm(&(&p - &p)), 0.0);

        let scaled = a * &p;
        prop_assert!((norm(&scaled) - a.abs() * norm(&p)).abs() <= 1e-12 * (1.0 + norm(&scaled)));
    }

    #[test]
    fn operators_are_linear(q1 in edges(), q2 in edges(), a in -5.0f64..5.0) {
        let combined = divergence(&(a * &q1 + &q2));
        let separate = a * divergence(&q1) + divergence(&q2);
        prop_assert!(norm(&(combined - separate)) <= 1e-11 * (1.0 + a.abs()));

        let combined = rot(&(a * &q1 + &q2));
        let separate = a * rot(&q1) + rot(&q2);
        prop_assert!(norm(&(combined - separate)) <= 1e-11 * (1.0 + a.abs()));
    }

    #[test]
    fn translating_uniform_x_flow_gives_uniform_y_flow(c in -10.0f64..10.0) {
        let mut src = EdgeData::<NX, NY>::zeros();
        src.y.fill(c);
        let mut dest = EdgeData::zeros();
        translate(&mut dest, &src);

        // interior x-edges see four y-values of c
        for i in 1..NX {
            for j in 1..=NY {
                prop_assert!((dest.x[(i, j)] - c).abs() <= 1e-14 * c.abs().max(1.0));
            }
        }
        prop_assert!(dest.y.iter().all(|&v| v == 0.0));
    }
}
