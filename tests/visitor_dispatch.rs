// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for visitor dispatch over expression trees

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use rstest::rstest;
use smpl::ast::{
    BinaryExp, Comparator, CompareExp, ConditionalExp, Exp, ExpressionType, LiteralValue, Visitor,
};

/// Visits the whole tree left to right, logging each handler; fails at `Var("boom")`
#[derive(Default)]
struct Recorder {
    log: Vec<String>,
}

#[derive(Debug, PartialEq)]
struct Boom;

impl Recorder {
    fn both(&mut self, tag: &str, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.log.push(tag.to_string());
        let left = operands.left().visit(self, depth + 1)?;
        let right = operands.right().visit(self, depth + 1)?;
        self.log.push(format!("/{tag}"));
        Ok(left + right + 1)
    }
}

impl Visitor<usize, usize> for Recorder {
    type Error = Boom;

    fn visit_lit(&mut self, _: &Exp, value: &LiteralValue, _: usize) -> Result<usize, Boom> {
        self.log.push(format!("lit {value}"));
        Ok(1)
    }
    fn visit_var(&mut self, _: &Exp, name: &str, _: usize) -> Result<usize, Boom> {
        self.log.push(format!("var {name}"));
        if name == "boom" { Err(Boom) } else { Ok(1) }
    }
    fn visit_add(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("add", operands, depth)
    }
    fn visit_sub(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("sub", operands, depth)
    }
    fn visit_mul(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("mul", operands, depth)
    }
    fn visit_div(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("div", operands, depth)
    }
    fn visit_mod(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("mod", operands, depth)
    }
    fn visit_pow(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("pow", operands, depth)
    }
    fn visit_and(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("and", operands, depth)
    }
    fn visit_or(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("or", operands, depth)
    }
    fn visit_not(&mut self, _: &Exp, operands: &BinaryExp, depth: usize) -> Result<usize, Boom> {
        self.both("not", operands, depth)
    }
    fn visit_compare(
        &mut self,
        _: &Exp,
        compare: &CompareExp,
        depth: usize,
    ) -> Result<usize, Boom> {
        self.log.push(format!("compare {}", compare.comparator()));
        let left = compare.left().visit(self, depth + 1)?;
        let right = compare.right().visit(self, depth + 1)?;
        self.log.push("/compare".to_string());
        Ok(left + right + 1)
    }
    fn visit_if(
        &mut self,
        _: &Exp,
        conditional: &ConditionalExp,
        depth: usize,
    ) -> Result<usize, Boom> {
        self.log.push("if".to_string());
        let mut total = 1;
        for child in [
            conditional.condition(),
            conditional.then_branch(),
            conditional.else_branch(),
        ] {
            total += child.visit(self, depth + 1)?;
        }
        self.log.push("/if".to_string());
        Ok(total)
    }
}

/// Reports which handler ran without descending
struct KindRecorder;

impl Visitor<(), ExpressionType> for KindRecorder {
    type Error = std::convert::Infallible;

    fn visit_lit(
        &mut self,
        _: &Exp,
        _: &LiteralValue,
        _: (),
    ) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Lit)
    }
    fn visit_var(&mut self, _: &Exp, _: &str, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Var)
    }
    fn visit_add(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Add)
    }
    fn visit_sub(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Sub)
    }
    fn visit_mul(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Mul)
    }
    fn visit_div(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Div)
    }
    fn visit_mod(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Mod)
    }
    fn visit_pow(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Pow)
    }
    fn visit_and(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::And)
    }
    fn visit_or(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Or)
    }
    fn visit_not(&mut self, _: &Exp, _: &BinaryExp, _: ()) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Not)
    }
    fn visit_compare(
        &mut self,
        _: &Exp,
        _: &CompareExp,
        _: (),
    ) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::Compare)
    }
    fn visit_if(
        &mut self,
        _: &Exp,
        _: &ConditionalExp,
        _: (),
    ) -> Result<ExpressionType, Self::Error> {
        Ok(ExpressionType::If)
    }
}

fn x() -> Exp {
    Exp::variable("x")
}

fn one() -> Exp {
    Exp::integer(1)
}

#[rstest]
#[case(Exp::integer(3), ExpressionType::Lit)]
#[case(x(), ExpressionType::Var)]
#[case(Exp::add(x(), one()), ExpressionType::Add)]
#[case(Exp::sub(x(), one()), ExpressionType::Sub)]
#[case(Exp::mul(x(), one()), ExpressionType::Mul)]
#[case(Exp::div(x(), one()), ExpressionType::Div)]
#[case(Exp::modulo(x(), one()), ExpressionType::Mod)]
#[case(Exp::pow(x(), one()), ExpressionType::Pow)]
#[case(Exp::and(x(), one()), ExpressionType::And)]
#[case(Exp::or(x(), one()), ExpressionType::Or)]
#[case(Exp::not(x(), one()), ExpressionType::Not)]
#[case(Exp::compare(Comparator::LessThan, x(), one()), ExpressionType::Compare)]
#[case(Exp::conditional(x(), one(), one()), ExpressionType::If)]
fn dispatch_selects_matching_handler(#[case] exp: Exp, #[case] expected: ExpressionType) {
    let Ok(handled) = exp.visit(&mut KindRecorder, ());
    assert_eq!(handled, expected);
    assert_eq!(handled, exp.expression_type());

    // Sign flag does not change dispatch
    let negated = exp.negated();
    let Ok(handled) = negated.visit(&mut KindRecorder, ());
    assert_eq!(handled, expected);
}

#[test]
fn recorder_sees_whole_tree_in_order() {
    let exp = Exp::add(
        Exp::mul(Exp::integer(2), x()),
        Exp::conditional(
            Exp::compare(Comparator::Equal, x(), one()),
            Exp::real(0.5),
            Exp::boolean(false),
        ),
    );
    let mut recorder = Recorder::default();
    let count = exp.visit(&mut recorder, 0).unwrap();

    assert_eq!(count, exp.node_count());
    assert_eq!(
        recorder.log,
        vec![
            "add", "mul", "lit 2", "var x", "/mul", "if", "compare =", "var x", "lit 1",
            "/compare", "lit 0.5", "lit false", "/if", "/add",
        ]
    );
}

#[test]
fn failure_stops_the_walk() {
    // (boom + 1) * (x - 2): nothing after `boom` may be visited
    let exp = Exp::mul(
        Exp::add(Exp::variable("boom"), one()),
        Exp::sub(x(), Exp::integer(2)),
    );
    let mut recorder = Recorder::default();

    assert_eq!(exp.visit(&mut recorder, 0), Err(Boom));
    assert_eq!(recorder.log, vec!["mul", "add", "var boom"]);
}

#[test]
fn failure_is_reproducible() {
    let exp = Exp::not(one(), Exp::variable("boom"));
    let mut first = Recorder::default();
    let mut second = Recorder::default();

    assert_eq!(exp.visit(&mut first, 0), exp.visit(&mut second, 0));
    assert_eq!(first.log, second.log);
}

#[test]
fn children_are_stable() {
    let exp = Exp::sub(Exp::add(x(), one()), Exp::integer(4)).negated();
    let (left_a, right_a) = exp.binary_operands().unwrap();
    let (left_b, right_b) = exp.binary_operands().unwrap();

    assert!(std::ptr::eq(left_a, left_b));
    assert!(std::ptr::eq(right_a, right_b));
    assert!(std::ptr::eq(exp.children()[0], left_a));
    assert!(exp.is_negative());
}

#[test]
fn visitor_state_can_live_outside_the_visitor() {
    // A pass whose state is shared through the argument rather than `self`
    struct Counter;

    impl<'a> Visitor<&'a RefCell<usize>, ()> for Counter {
        type Error = ();

        fn visit_lit(
            &mut self,
            _: &Exp,
            _: &LiteralValue,
            seen: &'a RefCell<usize>,
        ) -> Result<(), ()> {
            *seen.borrow_mut() += 1;
            Ok(())
        }
        fn visit_var(&mut self, _: &Exp, _: &str, seen: &'a RefCell<usize>) -> Result<(), ()> {
            *seen.borrow_mut() += 1;
            Ok(())
        }
        fn visit_add(
            &mut self,
            _: &Exp,
            o: &BinaryExp,
            seen: &'a RefCell<usize>,
        ) -> Result<(), ()> {
            o.left().visit(self, seen)?;
            o.right().visit(self, seen)
        }
        fn visit_sub(
            &mut self,
            _: &Exp,
            o: &BinaryExp,
            seen: &'a RefCell<usize>,
        ) -> Result<(), ()> {
            o.left().visit(self, seen)?;
            o.right().visit(self, seen)
        }
        fn visit_mul(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_div(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_mod(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_pow(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_and(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_or(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_not(&mut self, _: &Exp, _: &BinaryExp, _: &'a RefCell<usize>) -> Result<(), ()> {
            Err(())
        }
        fn visit_compare(
            &mut self,
            _: &Exp,
            _: &CompareExp,
            _: &'a RefCell<usize>,
        ) -> Result<(), ()> {
            Err(())
        }
        fn visit_if(
            &mut self,
            _: &Exp,
            _: &ConditionalExp,
            _: &'a RefCell<usize>,
        ) -> Result<(), ()> {
            Err(())
        }
    }

    let seen = RefCell::new(0);
    let exp = Exp::add(Exp::sub(x(), one()), Exp::variable("y"));
    assert_eq!(exp.visit(&mut Counter, &seen), Ok(()));
    assert_eq!(*seen.borrow(), 3);

    let exp = Exp::add(x(), Exp::mul(one(), one()));
    assert_eq!(exp.visit(&mut Counter, &seen), Err(()));
    assert_eq!(*seen.borrow(), 4);
}

#[test]
fn concurrent_traversals_share_one_tree() {
    let exp = smpl::parse("(a + 1) * (b - 2) not c or d").unwrap();

    let shared = &exp;

    let logs: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let mut recorder = Recorder::default();
                    shared.visit(&mut recorder, 0).unwrap();
                    recorder.log
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for log in &logs[1..] {
        assert_eq!(log, &logs[0]);
    }
}
