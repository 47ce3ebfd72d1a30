//! Instance and solution records on disk.
//!
//! Integers may exceed 64 bits; they are read from JSON numbers or strings
//! and written as JSON numbers (exact, via `arbitrary_precision`).

use anyhow::{bail, ensure, Context, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use polycover::geom::{ConvexPolygon, Point, Region, SimplePolygon};
use polycover::verify::verify;
use polycover::{Cover, CoverError, Instance};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const INSTANCE_TYPE: &str = "CGSHOP2023_Instance";
pub const SOLUTION_TYPE: &str = "CGSHOP2023_Solution";

mod bigint_json {
    use num_bigint::BigInt;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};

    pub fn serialize<S: Serializer>(v: &BigInt, s: S) -> Result<S::Ok, S::Error> {
        let n: Number = v.to_string().parse().map_err(S::Error::custom)?;
        n.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigInt, D::Error> {
        let text = match Value::deserialize(d)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            other => return Err(D::Error::custom(format!("expected integer, got {other}"))),
        };
        text.trim()
            .parse::<BigInt>()
            .map_err(|e| D::Error::custom(format!("bad integer {text:?}: {e}")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntPoint {
    #[serde(with = "bigint_json")]
    pub x: BigInt,
    #[serde(with = "bigint_json")]
    pub y: BigInt,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub n: Option<u64>,
    pub outer_boundary: Vec<IntPoint>,
    #[serde(default)]
    pub holes: Vec<Vec<IntPoint>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fraction {
    #[serde(with = "bigint_json")]
    pub num: BigInt,
    /// Older writers spell this `dem`.
    #[serde(with = "bigint_json", alias = "dem")]
    pub den: BigInt,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatPoint {
    pub x: Fraction,
    pub y: Fraction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub instance: String,
    pub polygons: Vec<Vec<RatPoint>>,
}

/// A solution file after conversion.
#[derive(Clone, Debug)]
pub struct LoadedSolution {
    pub instance: String,
    pub cover: Cover,
}

impl InstanceRecord {
    pub fn into_instance(self) -> Result<Instance> {
        ensure!(
            self.kind == INSTANCE_TYPE,
            "wrong record type {:?}, expected {INSTANCE_TYPE:?}",
            self.kind
        );
        let ring = |pts: Vec<IntPoint>| {
            SimplePolygon::new(
                pts.into_iter()
                    .map(|p| {
                        Point::new(
                            BigRational::from_integer(p.x),
                            BigRational::from_integer(p.y),
                        )
                    })
                    .collect(),
            )
        };
        let expected = self.n;
        let outer = ring(self.outer_boundary);
        let holes: Vec<SimplePolygon> = self.holes.into_iter().map(ring).collect();
        let region = Region::new(outer, holes);
        if let Some(n) = expected {
            if n as usize != region.vertex_count() {
                tracing::warn!(
                    instance = self.name.as_str(),
                    declared = n,
                    actual = region.vertex_count(),
                    "vertex count mismatch"
                );
            }
        }
        Instance::new(self.name.clone(), region)
            .with_context(|| format!("building instance {}", self.name))
    }
}

impl Fraction {
    fn to_coord(&self) -> Result<BigRational> {
        if self.den.is_zero() {
            bail!("zero denominator in {}/{}", self.num, self.den);
        }
        Ok(BigRational::new(self.num.clone(), self.den.clone()))
    }

    fn from_coord(c: &BigRational) -> Self {
        Self {
            num: c.numer().clone(),
            den: c.denom().clone(),
        }
    }
}

impl SolutionRecord {
    pub fn from_cover(instance: &str, cover: &Cover) -> Self {
        let polygons = cover
            .pieces()
            .iter()
            .map(|piece| {
                piece
                    .vertices()
                    .iter()
                    .map(|p| RatPoint {
                        x: Fraction::from_coord(&p.x),
                        y: Fraction::from_coord(&p.y),
                    })
                    .collect()
            })
            .collect();
        Self {
            kind: SOLUTION_TYPE.to_string(),
            instance: instance.to_string(),
            polygons,
        }
    }

    pub fn into_solution(self) -> Result<LoadedSolution> {
        ensure!(
            self.kind == SOLUTION_TYPE,
            "wrong record type {:?}, expected {SOLUTION_TYPE:?}",
            self.kind
        );
        let mut pieces = Vec::with_capacity(self.polygons.len());
        for (k, poly) in self.polygons.into_iter().enumerate() {
            let pts = poly
                .iter()
                .map(|p| -> Result<Point> { Ok(Point::new(p.x.to_coord()?, p.y.to_coord()?)) })
                .collect::<Result<Vec<Point>>>()
                .with_context(|| format!("polygon {k}"))?;
            pieces.push(ConvexPolygon::from_loop(pts));
        }
        Ok(LoadedSolution {
            instance: self.instance,
            cover: Cover::new(pieces),
        })
    }
}

pub fn read_instance(path: &Path) -> Result<Instance> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let record: InstanceRecord = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing instance {}", path.display()))?;
    record
        .into_instance()
        .with_context(|| format!("loading instance {}", path.display()))
}

pub fn read_solution(path: &Path) -> Result<LoadedSolution> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let record: SolutionRecord = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing solution {}", path.display()))?;
    record
        .into_solution()
        .with_context(|| format!("loading solution {}", path.display()))
}

pub fn write_solution(path: &Path, instance: &str, cover: &Cover) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating solution dir {}", parent.display()))?;
        }
    }
    let record = SolutionRecord::from_cover(instance, cover);
    fs::write(path, serde_json::to_vec(&record)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// `<out_dir>/<instance>.solution.json`
pub fn solution_path(out_dir: &Path, instance: &str) -> PathBuf {
    out_dir.join(format!("{instance}.solution.json"))
}

/// What [`write_if_better`] did.
#[derive(Debug, PartialEq)]
pub enum WriteOutcome {
    /// Written; `previous` is the size of the valid solution it replaced.
    Written { previous: Option<usize> },
    /// A valid solution at least as small is already on disk.
    KeptExisting { existing: usize },
    /// The new cover does not verify; nothing written.
    Rejected(CoverError),
}

/// Persist `cover` only if it verifies and beats whatever valid solution is on disk.
pub fn write_if_better(instance: &Instance, cover: &Cover, path: &Path) -> Result<WriteOutcome> {
    if let Err(e) = verify(instance, cover) {
        return Ok(WriteOutcome::Rejected(e));
    }
    let previous = if path.exists() {
        match read_solution(path) {
            Ok(prior) if prior.instance == instance.name() => {
                match verify(instance, &prior.cover) {
                    Ok(()) => Some(prior.cover.len()),
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "existing solution invalid"
                        );
                        None
                    }
                }
            }
            Ok(prior) => {
                tracing::warn!(
                    path = %path.display(),
                    found = prior.instance.as_str(),
                    "existing solution is for another instance"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{e:#}"),
                    "existing solution unreadable"
                );
                None
            }
        }
    } else {
        None
    };
    if let Some(existing) = previous {
        if existing <= cover.len() {
            return Ok(WriteOutcome::KeptExisting { existing });
        }
    }
    write_solution(path, instance.name(), cover)?;
    Ok(WriteOutcome::Written { previous })
}
