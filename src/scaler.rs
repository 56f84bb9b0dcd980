use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from dest pixels to src neighbors + weights
struct ScaleLut {
    x0: Vec<usize>,
    x1: Vec<usize>,
    wx: Vec<u16>,
    y0: Vec<usize>,
    y1: Vec<usize>,
    wy: Vec<u16>,
}

/// Source index pairs and 8.8 fixed-point weights for one axis.
fn axis_lut(dst: usize, src: usize) -> (Vec<usize>, Vec<usize>, Vec<u16>) {
    let step = src as f32 / dst as f32;
    let last = src.saturating_sub(1);
    let mut i0 = Vec::with_capacity(dst);
    let mut i1 = Vec::with_capacity(dst);
    let mut w = Vec::with_capacity(dst);
    for d in 0..dst {
        let f = d as f32 * step;
        let lo = (f.floor() as usize).min(last);
        i0.push(lo);
        i1.push((lo + 1).min(last));
        w.push(((f - lo as f32).clamp(0.0, 1.0) * 256.0).round() as u16);
    }
    (i0, i1, w)
}

impl ScaleLut {
    fn build(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let (x0, x1, wx) = axis_lut(dst_w, src_w);
        let (y0, y1, wy) = axis_lut(dst_h, src_h);
        Self {
            x0,
            x1,
            wx,
            y0,
            y1,
            wy,
        }
    }
}

#[inline]
fn lerp_color_u32(a: u32, b: u32, w256: u32) -> u32 {
    // w256 in [0, 256]; inv = 256 - w256
    let inv = 256 - w256;
    // Interpolate R and B together (00RR00BB), with mask 0x00FF00FF,
    let rb = ((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w256) >> 8 & 0x00FF00FF;
    // Interpolate G separately (0000GG00), with mask 0x0000FF00
    let g = ((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w256) >> 8 & 0x0000FF00;
    rb | g // alpha stays 0
}

/// Stretches the fixed-size game framebuffer onto a window surface of any size.
pub struct Presenter {
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    lut: ScaleLut,
}

impl Presenter {
    pub fn new(src_w: usize, src_h: usize) -> Self {
        Self {
            src_w,
            src_h,
            dst_w: src_w,
            dst_h: src_h,
            lut: ScaleLut::build(src_w, src_h, src_w, src_h),
        }
    }

    /// Rebuild the lookup tables if the surface size changed.
    pub fn resize(&mut self, dst_w: usize, dst_h: usize) {
        if dst_w == self.dst_w && dst_h == self.dst_h {
            return;
        }
        log::debug!(
            "Presenting {}x{} frame on {}x{} surface",
            self.src_w,
            self.src_h,
            dst_w,
            dst_h
        );
        self.dst_w = dst_w;
        self.dst_h = dst_h;
        self.lut = ScaleLut::build(dst_w, dst_h, self.src_w, self.src_h);
    }

    /// Parallel bilinear stretch
    /// Rows are processed in parallel for cache friendly writes
    pub fn blit(&self, dst: &mut [u32], src: &[u32]) {
        let (dw, sw) = (self.dst_w, self.src_w);
        if dw == 0 || sw == 0 {
            return;
        }
        let lut = &self.lut;
        dst.par_chunks_mut(dw)
            .take(self.dst_h)
            .enumerate()
            .for_each(|(y, dst_row)| {
                let row0 = lut.y0[y] * sw;
                let row1 = lut.y1[y] * sw;
                let wy = lut.wy[y] as u32;

                for (x, out) in dst_row.iter_mut().enumerate() {
                    let (x0, x1) = (lut.x0[x], lut.x1[x]);
                    let wx = lut.wx[x] as u32;

                    let top = lerp_color_u32(src[row0 + x0], src[row0 + x1], wx);
                    let bot = lerp_color_u32(src[row1 + x0], src[row1 + x1], wx);
                    *out = lerp_color_u32(top, bot, wy);
                }
            });
    }
}
