use test_case::test_case;

use crate::indexing::{Size, Window};

#[test]
fn test_size_past_end_counts_as_one() {
    let s = Size::from([4, 2]);
    assert_eq!(s.get(0), 4);
    assert_eq!(s.get(5), 1);
    assert_eq!(s.product(), 8);
}

#[test]
fn test_size_ops() {
    let a = Size::from([4, 6]);
    let b = Size::from([6, 4]);
    assert_eq!(a.lcm(&b), Size::from([12, 12]));
    assert_eq!(a.mul(&b), Size::from([24, 24]));
    assert_eq!(Size::from([10, 3]).div_ceil(&Size::from([4, 3])), Size::from([3, 1]));
    assert_eq!(a.to_string(), "[4,6]");
}

#[test_case(Window::new([(-1, 1)]), Size::from([1]), Window::new([(-1, 1)]); "stencil over unit stride")]
#[test_case(Window::new([(0, 1)]), Size::from([2]), Window::new([(0, 0)]); "exactly one stride")]
#[test_case(Window::new([(-2, 3)]), Size::from([2]), Window::new([(-2, 2)]); "wide read over stride two")]
fn test_sub_size(read: Window, stride: Size, expected: Window) {
    assert_eq!(read.sub_size(&stride), expected);
}

#[test]
fn test_inflate_to_multiple_of_grain() {
    let w = Window::new([(-1, 1), (0, 0)]);
    assert_eq!(w.inflate_to_multiple_of(&Size::from([4, 2])), Window::new([(-4, 4), (0, 0)]));
    assert_eq!(w.div_round_outward(&Size::from([4, 2])), Window::new([(-1, 1), (0, 0)]));
}

#[test]
fn test_union_add_scale() {
    let a = Window::new([(-1, 0)]);
    let b = Window::new([(0, 2)]);
    assert_eq!(a.union(&b), Window::new([(-1, 2)]));
    assert_eq!(a.add(&b), Window::new([(-1, 2)]));
    assert_eq!(Window::symmetric(1, 1).scale(&Size::from([2]), &Size::from([1])), Window::new([(-2, 2)]));
    assert_eq!(Window::new([(-3, 1)]).symmetry_union(), Window::new([(-3, 3)]));
}

#[test]
fn test_window_shape_queries() {
    let w = Window::symmetric(2, 2);
    assert_eq!(w.len(0), 5);
    assert_eq!(w.range(3), (0, 0));
    assert!(!w.is_empty());
    assert!(Window::new([(1, 0)]).is_empty());
    assert!(Window::zero(2).is_zero());
    assert_eq!(Window::covering(&Size::from([2, 1])), Window::new([(0, 1), (0, 0)]));
    assert_eq!(w.to_string(), "[-2:2,-2:2]");
}
