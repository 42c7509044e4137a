
use std::fmt::{self,Display,Formatter};

///A simple dense matrix. Used for the traffic between hosts and for the bandwidth and load of the channels between routers.
///Entries are stored by columns; this is not observable from the interface.
#[derive(Debug,Clone,PartialEq)]
pub struct Matrix<T>
{
	data: Vec<T>,
	num_rows: usize,
	num_columns: usize,
}

impl<T> Matrix<T>
{
	fn index(&self,row:usize,column:usize) -> usize
	{
		if row>=self.num_rows || column>=self.num_columns
		{
			panic!("IndexError: entry ({},{}) out of range in a {}x{} matrix",row,column,self.num_rows,self.num_columns);
		}
		self.num_rows*column+row
	}
	///Read a matrix entry. Panics if out of range.
	pub fn get(&self,row:usize,column:usize) -> &T
	{
		&self.data[self.index(row,column)]
	}
	///Read/write a matrix entry. Panics if out of range.
	pub fn get_mut(&mut self,row:usize,column:usize) -> &mut T
	{
		let index = self.index(row,column);
		&mut self.data[index]
	}
	///Read a matrix entry, or `None` if out of range.
	pub fn try_get(&self,row:usize,column:usize) -> Option<&T>
	{
		if row>=self.num_rows || column>=self.num_columns
		{
			None
		}
		else
		{
			self.data.get(self.num_rows*column+row)
		}
	}
	///Get the number of rows
	pub fn get_rows(&self) -> usize
	{
		self.num_rows
	}
	///Get the number of columns
	pub fn get_columns(&self) -> usize
	{
		self.num_columns
	}
	///Build a matrix with constant values.
	pub fn constant(value:T,num_rows:usize,num_columns:usize) -> Matrix<T> where T:Clone
	{
		Matrix{
			data: vec![value;num_rows*num_columns],
			num_rows,
			num_columns,
		}
	}
	///Iterate over all the entries, in no particular order.
	pub fn iter(&self) -> std::slice::Iter<T>
	{
		self.data.iter()
	}
	/// Iterate over elements outside the diagonal.
	pub fn outside_diagonal(&self) -> OutsideDiagonal<T>
	{
		OutsideDiagonal{ matrix: self, row:0, column:0 }
	}
}

impl<T:Display> Display for Matrix<T>
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		for row in 0..self.num_rows
		{
			for column in 0..self.num_columns
			{
				write!(f,"{},",self.get(row,column))?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

pub struct OutsideDiagonal<'a, T>
{
	matrix: &'a Matrix<T>,
	row: usize,
	column: usize,
}

impl<'a,T> Iterator for OutsideDiagonal<'a,T>
{
	type Item = &'a T;
	fn next(&mut self) -> Option<<Self as Iterator>::Item>
	{
		while self.row < self.matrix.get_rows()
		{
			if self.column>=self.matrix.get_columns()
			{
				self.column = 0;
				self.row += 1;
				continue;
			}
			let (row,column) = (self.row,self.column);
			self.column+=1;
			if row!=column
			{
				return Some(self.matrix.get(row,column));
			}
		}
		None
	}
}

///A square matrix whose writes always go to both `(row,column)` and `(column,row)`.
#[derive(Debug,Clone,PartialEq)]
pub struct SymmetricalMatrix<T>
{
	matrix: Matrix<T>,
}

impl<T> SymmetricalMatrix<T>
{
	pub fn constant(value:T,size:usize) -> SymmetricalMatrix<T> where T:Clone
	{
		SymmetricalMatrix{ matrix: Matrix::constant(value,size,size) }
	}
	pub fn size(&self) -> usize
	{
		self.matrix.get_rows()
	}
	pub fn get(&self,row:usize,column:usize) -> &T
	{
		self.matrix.get(row,column)
	}
	///Write `value` into both `(row,column)` and `(column,row)`.
	pub fn set(&mut self,row:usize,column:usize,value:T) where T:Clone
	{
		//Check both before writing any.
		let _ = self.matrix.index(row,column);
		*self.matrix.get_mut(column,row) = value.clone();
		*self.matrix.get_mut(row,column) = value;
	}
	pub fn iter(&self) -> std::slice::Iter<T>
	{
		self.matrix.iter()
	}
}

impl<T:Display> Display for SymmetricalMatrix<T>
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		Display::fmt(&self.matrix,f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn entries_are_stable()
	{
		let mut m = Matrix::constant(0usize,2,3);
		for row in 0..2
		{
			for column in 0..3
			{
				*m.get_mut(row,column) = 10*row+column;
			}
		}
		assert_eq!(*m.get(1,2),12);
		assert_eq!(*m.get(0,1),1);
		assert_eq!(m.try_get(2,0),None);
		assert_eq!(m.try_get(0,3),None);
		assert_eq!(m.try_get(1,0),Some(&10));
		let outside : Vec<usize> = m.outside_diagonal().cloned().collect();
		assert_eq!(outside,vec![1,2,10,12]);
	}
	#[test]
	#[should_panic(expected = "IndexError")]
	fn out_of_range_panics()
	{
		let m = Matrix::constant(0u8,3,3);
		m.get(3,0);
	}
	#[test]
	fn symmetric_writes()
	{
		let mut s = SymmetricalMatrix::constant(0usize,4);
		s.set(1,3,7);
		assert_eq!(*s.get(1,3),7);
		assert_eq!(*s.get(3,1),7);
		s.set(3,1,*s.get(3,1)+2);
		assert_eq!(*s.get(1,3),9);
		assert_eq!(s.iter().sum::<usize>(),18);
		assert_eq!(format!("{}",s).lines().count(),4);
	}
}
