/// Scene description parser: box origin, edge vectors and camera positions
///
/// ```text
/// # comment
/// origin 1 1 1
/// edge   2 0 0
/// edge   0 2 0
/// edge   0 0 2
/// camera 6, 6, 6
/// ```
use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, line_ending, multispace1, not_line_ending, space0, space1},
    combinator::{all_consuming, eof, recognize, value},
    multi::{many0, many0_count},
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::Parallelepiped;
use crate::projection::Camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Origin,
    Edge,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Statement {
    keyword: Keyword,
    coords: (f64, f64, f64),
    line: usize,
}

/// A box and the cameras to look at it from
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub origin: Point3<f64>,
    pub edges: [Vector3<f64>; 3],
    pub cameras: Vec<Camera>,
}

impl Default for Scene {
    /// A box of side 2 at (1, 1, 1), seen from (6, 6, 6) and (8, 8, 5)
    fn default() -> Self {
        Self {
            origin: Point3::new(1.0, 1.0, 1.0),
            edges: [
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0),
                Vector3::new(0.0, 0.0, 2.0),
            ],
            cameras: vec![Camera::new(6.0, 6.0, 6.0), Camera::new(8.0, 8.0, 5.0)],
        }
    }
}

impl Scene {
    /// Parse a scene description.
    ///
    /// Requires exactly one `origin` and three `edge` statements; `camera`
    /// statements are optional and kept in file order.
    pub fn parse(input: &str) -> Result<Self> {
        let (rest, statements) = parse_statements(input)
            .map_err(|e| Error::Parse(format!("{:?}", e)))?;

        if !rest.is_empty() {
            let line = line_number(input, rest);
            let text = rest.lines().next().unwrap_or_default().trim();
            return Err(Error::Parse(format!(
                "unrecognized statement at line {}: {:?}",
                line, text
            )));
        }

        let mut origin = None;
        let mut edges = Vec::with_capacity(3);
        let mut cameras = Vec::new();
        for statement in &statements {
            let (x, y, z) = statement.coords;
            match statement.keyword {
                Keyword::Origin => {
                    if origin.is_some() {
                        return Err(Error::Parse(format!(
                            "duplicate origin at line {}, expected exactly one",
                            statement.line
                        )));
                    }
                    origin = Some(Point3::new(x, y, z));
                }
                Keyword::Edge => {
                    if edges.len() == 3 {
                        return Err(Error::Parse(format!(
                            "extra edge at line {}, expected exactly three",
                            statement.line
                        )));
                    }
                    edges.push(Vector3::new(x, y, z));
                }
                Keyword::Camera => cameras.push(Camera::new(x, y, z)),
            }
        }

        let origin =
            origin.ok_or_else(|| Error::Parse("missing origin, expected exactly one".to_string()))?;
        let edges: [Vector3<f64>; 3] = edges.try_into().map_err(|found: Vec<_>| {
            Error::Parse(format!("expected exactly three edges, found {}", found.len()))
        })?;

        Ok(Self {
            origin,
            edges,
            cameras,
        })
    }

    /// Build the scene's box, checking the octant constraint
    pub fn parallelepiped(&self) -> Result<Parallelepiped> {
        let [v1, v2, v3] = self.edges;
        Parallelepiped::new(self.origin, v1, v2, v3)
    }
}

/// Parse a single `x y z` or `x,y,z` triple
pub fn parse_point(input: &str) -> Result<Point3<f64>> {
    match all_consuming(delimited(space0, parse_triple, space0))(input) {
        Ok((_, (x, y, z))) => Ok(Point3::new(x, y, z)),
        Err(_) => Err(Error::Parse(format!(
            "expected three numbers, got {:?}",
            input
        ))),
    }
}

fn parse_statements(input: &str) -> IResult<&str, Vec<Statement>> {
    let start = input;
    let (input, statements) = many0(preceded(skip_blank, |i| parse_statement(start, i)))(input)?;
    let (input, _) = skip_blank(input)?;
    Ok((input, statements))
}

fn parse_statement<'a>(start: &str, input: &'a str) -> IResult<&'a str, Statement> {
    let line = line_number(start, input);
    let (input, keyword) = alt((
        value(Keyword::Origin, tag("origin")),
        value(Keyword::Edge, tag("edge")),
        value(Keyword::Camera, tag("camera")),
    ))(input)?;
    let (input, coords) = preceded(space1, parse_triple)(input)?;
    let (input, _) = preceded(space0, alt((line_ending, comment, eof)))(input)?;
    Ok((
        input,
        Statement {
            keyword,
            coords,
            line,
        },
    ))
}

fn parse_triple(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, x) = double(input)?;
    let (input, _) = separator(input)?;
    let (input, y) = double(input)?;
    let (input, _) = separator(input)?;
    let (input, z) = double(input)?;
    Ok((input, (x, y, z)))
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((recognize(tuple((space0, char(','), space0))), space1))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('#'), not_line_ending))(input)
}

fn skip_blank(input: &str) -> IResult<&str, usize> {
    many0_count(alt((multispace1, comment)))(input)
}

/// 1-based line of `rest` within `input`, where `rest` is a suffix of `input`
fn line_number(input: &str, rest: &str) -> usize {
    let consumed = &input[..input.len() - rest.len()];
    consumed.matches('\n').count() + 1
}
