//! Types shared by the mapper tests.

use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::decl::Bind;

#[derive(Bind, Debug, PartialEq, Clone)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Bind, Debug, PartialEq, Clone)]
pub struct Circle {
    pub r: u32,
}

#[derive(Bind, Debug, PartialEq, Clone)]
pub struct Rectangle {
    pub w: u32,
    pub h: u32,
}

#[derive(Bind, Debug, PartialEq, Clone)]
pub enum Shape {
    Circle(Circle),
    Rectangle(Rectangle),
}

#[derive(Bind, Debug, PartialEq, Clone, Copy)]
pub enum Color {
    Red,
    Green,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: Option<u32>,
    pub nick: Option<String>,
    pub home: Option<Point>,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub color: Color,
    pub main: Shape,
    pub extra: Option<Shape>,
    pub shapes: Vec<Shape>,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Framed {
    #[bind(union(Circle))]
    pub shape: Shape,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Chain {
    pub value: u8,
    pub next: Option<Box<Chain>>,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Tree {
    pub label: String,
    pub children: Vec<Tree>,
}

#[derive(Bind)]
pub struct Loop {
    pub id: u8,
    pub next: Box<Loop>,
}

#[derive(Bind, Debug, PartialEq)]
pub struct Inventory {
    pub cells: [u8; 3],
    pub tags: VecDeque<String>,
    pub ids: BTreeSet<u32>,
    pub gaps: Vec<Option<i16>>,
}

pub trait Creature: Any + Send + Sync {}
crate::open_union!(dyn Creature);

#[derive(Bind, Debug, PartialEq)]
#[bind(member_of(Box<dyn Creature>))]
pub struct Wolf {
    pub teeth: u8,
}
impl Creature for Wolf {}

/// Implements the trait without joining the union.
#[derive(Bind, Debug, PartialEq)]
pub struct Rogue {
    pub id: u8,
}
impl Creature for Rogue {}

pub fn drawing() -> Drawing {
    Drawing {
        title: String::from("sketch"),
        color: Color::Green,
        main: Shape::Circle(Circle { r: 5 }),
        extra: None,
        shapes: alloc::vec![
            Shape::Rectangle(Rectangle { w: 2, h: 3 }),
            Shape::Circle(Circle { r: 1 }),
        ],
    }
}

pub fn chain(values: &[u8]) -> Option<Box<Chain>> {
    values.iter().rev().fold(None, |next, &value| {
        Some(Box::new(Chain { value, next }))
    })
}

pub fn tree() -> Tree {
    Tree {
        label: String::from("root"),
        children: alloc::vec![
            Tree {
                label: String::from("leaf"),
                children: Vec::new(),
            },
            Tree {
                label: String::from("branch"),
                children: alloc::vec![Tree {
                    label: String::from("deep"),
                    children: Vec::new(),
                }],
            },
        ],
    }
}
