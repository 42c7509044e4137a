/*!

Distribution of the ports of the network among its routers.

Each router gets a random weight in `[offset,1+offset)` and receives a share of the ports proportional to its weight. A larger offset flattens the distribution. The offsets computed here are the smallest ones that guarantee a bound on the ports of every router whatever the random weights turn out to be.

*/

use log::debug;

use crate::random::TopologyRandom;

///Which extreme weight assignment to simulate in [simulate_extreme_distribution].
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum ExtremeWeights
{
	///Every router draws 1 except the last, which draws 0. Yields the minimum share.
	AllButOneHigh,
	///Every router draws 0 except the last, which draws 1. Yields the maximum share.
	AllButOneLow,
}

/**
Offset for the `[0,1)` weights such that no router receives fewer than `min` ports.
When `routers==ports` every router gets exactly one port and the offset is irrelevant, so it returns 0.
When `min*routers==ports` only the equal split works and it returns infinity, which [random_distribution] understands.
Panics if `routers>ports` or if `min*routers>ports`, as the bound is then impossible.
**/
pub fn min_random_offset(routers:usize, ports:usize, min:usize) -> f64
{
	assert!(routers<=ports,"cannot distribute {} ports over {} routers",ports,routers);
	assert!(min*routers<=ports,"cannot give {} ports to each of {} routers with only {} ports",min,routers,ports);
	if routers==ports
	{
		debug!("min_random_offset: {} routers and {} ports, one port per router",routers,ports);
		return 0.0;
	}
	if min*routers==ports
	{
		debug!("min_random_offset: {} ports can only be split evenly",ports);
		return f64::INFINITY;
	}
	(min*(routers-1)) as f64 / (ports-min*routers) as f64
}

/**
Offset for the `[0,1)` weights such that no router receives more than `max` ports.
Returns 0 when the bound holds for any weights, including the `routers==ports` case.
Returns infinity when `max*routers==ports`.
Panics if `routers>ports` or if `max*routers<ports`, as the bound is then impossible.
**/
pub fn max_random_offset(routers:usize, ports:usize, max:usize) -> f64
{
	assert!(routers<=ports,"cannot distribute {} ports over {} routers",ports,routers);
	assert!(max*routers>=ports,"cannot place {} ports in {} routers of at most {} ports",ports,routers,max);
	if routers==ports || max>=ports
	{
		return 0.0;
	}
	if max*routers==ports
	{
		debug!("max_random_offset: {} ports can only be split evenly",ports);
		return f64::INFINITY;
	}
	(ports-max) as f64 / (max*routers-ports) as f64
}

///An offset satisfying both bounds at once. The larger offset is the more restrictive one.
pub fn bounded_offset(routers:usize, ports:usize, min:usize, max:Option<usize>) -> f64
{
	let min_offset = min_random_offset(routers,ports,min);
	match max
	{
		Some(max) => min_offset.max(max_random_offset(routers,ports,max)),
		None => min_offset,
	}
}

/**
The fewest ports a router may get with the given offset, before rounding.
Considers a situation where generated probability is 1 for every router except for one with probability of 0.
**/
pub fn min_ports_count(routers:usize, ports:usize, offset:f64) -> f64
{
	let routers = routers as f64;
	offset / ((routers-1.0)*(1.0+offset)+offset) * ports as f64
}

/**
The most ports a router may get with the given offset, before rounding.
Considers a situation where generated probability is 0 for every router except for one with probability of 1.
**/
pub fn max_ports_count(routers:usize, ports:usize, offset:f64) -> f64
{
	let routers = routers as f64;
	(1.0+offset) / ((routers-1.0)*offset+1.0+offset) * ports as f64
}

/**
Turn positive weights into integer port counts adding up to `ports`.
The rounding error of each router is carried to the next one, so the order of the weights matters.
**/
fn round_shares(weights:&[f64], ports:usize) -> Vec<usize>
{
	let accumulated : f64 = weights.iter().sum();
	if accumulated<=0.0
	{
		//Every weight was drawn as zero. Treat them as equal.
		return round_shares(&vec![1.0;weights.len()],ports);
	}
	let mut error = 0.0;
	let mut result = Vec::with_capacity(weights.len());
	for weight in weights
	{
		let share = weight / accumulated * ports as f64;
		let rounded = (share+error).round().max(0.0);
		error += share - rounded;
		result.push(rounded as usize);
	}
	debug_assert_eq!(result.iter().sum::<usize>(),ports);
	result
}

/**
Randomly distribute `ports` over `routers`, every router receiving at least one when `routers==ports`.
`offset` is added to each random weight; it should be non-negative, and may be infinite to force an even split.
Panics if `routers>ports` or `routers==0`.
**/
pub fn random_distribution(routers:usize, ports:usize, offset:f64, random:&mut TopologyRandom) -> Vec<usize>
{
	assert!(routers>0,"cannot distribute ports over no routers");
	assert!(routers<=ports,"cannot distribute {} ports over {} routers",ports,routers);
	if routers==ports
	{
		return vec![1;routers];
	}
	let weights : Vec<f64> = if offset.is_infinite()
	{
		vec![1.0;routers]
	}
	else
	{
		(0..routers).map(|_|random.uniform()+offset).collect()
	};
	round_shares(&weights,ports)
}

/// Apply the rounding to the worst case weights for the given offset. Useful to check the offsets.
pub fn simulate_extreme_distribution(routers:usize, ports:usize, offset:f64, extreme:ExtremeWeights) -> Vec<usize>
{
	assert!(routers>0,"cannot distribute ports over no routers");
	let (common,last) = match extreme
	{
		ExtremeWeights::AllButOneHigh => (1.0+offset,offset),
		ExtremeWeights::AllButOneLow => (offset,1.0+offset),
	};
	let mut weights = vec![common;routers-1];
	weights.push(last);
	round_shares(&weights,ports)
}
