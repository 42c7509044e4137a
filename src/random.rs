/*!

The source of randomness of a run.

A single [TopologyRandom] is created per run and lent by exclusive reference to every operation that draws from it. The order of those calls determines the whole run, so it must not be shared between threads. Code wanting to evaluate in parallel must build an independent `TopologyRandom` per task.

*/

use rand::{Rng,SeedableRng,rngs::StdRng};
use rand::distributions::{Distribution,Uniform};

pub struct TopologyRandom
{
	rng: StdRng,
	uniform: Uniform<f64>,
}

impl TopologyRandom
{
	pub fn new(seed:u64) -> TopologyRandom
	{
		TopologyRandom::from_rng(StdRng::seed_from_u64(seed))
	}
	pub fn from_rng(rng:StdRng) -> TopologyRandom
	{
		TopologyRandom{
			rng,
			uniform: Uniform::new(0.0,1.0),
		}
	}
	///A real in `[0,1)`.
	pub fn uniform(&mut self) -> f64
	{
		self.uniform.sample(&mut self.rng)
	}
	///An integer in `[0,bound)`. Panics if `bound==0`.
	pub fn index(&mut self, bound:usize) -> usize
	{
		self.rng.gen_range(0..bound)
	}
	///The underlying generator, for shuffles and other uses of `rand`.
	pub fn rng(&mut self) -> &mut StdRng
	{
		&mut self.rng
	}
}
