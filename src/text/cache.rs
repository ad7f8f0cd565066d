//! Bounded cache of rasterised glyphs.
//!
//! Glyphs are expanded from their packed font bits into one alpha byte per
//! pixel the first time they are drawn through a driver that supports
//! [`copy_char`](crate::ll::LowLevel::copy_char). The cache is keyed by
//! (font identity, character code) and holds at most `capacity` entries; the
//! least recently used entry is evicted when a new glyph does not fit.

use alloc::vec::Vec;

use super::{Font, FontChar};
use crate::config::GLYPH_CACHE_SIZE;

/// Alpha values for the four anti-aliasing levels.
const AA_ALPHA: [u8; 4] = [0x00, 0x55, 0xAA, 0xFF];

/// One rasterised glyph.
pub struct CachedGlyph {
    font: usize,
    code: u32,
    pub width: i32,
    pub height: i32,
    /// `width * height` alpha bytes, row-major.
    pub alpha: Vec<u8>,
    last_used: u32,
}

impl CachedGlyph {
    fn rasterize(
        font: &Font,
        code: u32,
        glyph: &FontChar,
    ) -> Self {
        let width = glyph.width as usize;
        let height = glyph.height as usize;
        let mut alpha = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                alpha.push(AA_ALPHA[glyph.coverage(font.antialiased, x, y) as usize]);
            }
        }
        Self {
            font: font.id(),
            code,
            width: width as i32,
            height: height as i32,
            alpha,
            last_used: 0,
        }
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub evictions: u32,
}

/// LRU cache of rasterised glyphs.
pub struct GlyphCache {
    entries: Vec<CachedGlyph>,
    capacity: usize,
    tick: u32,
    stats: CacheStats,
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Cached glyph for (`font`, `code`), rasterising it on a miss.
    pub fn get_or_insert(
        &mut self,
        font: &Font,
        code: u32,
        glyph: &FontChar,
    ) -> &CachedGlyph {
        self.tick = self.tick.wrapping_add(1);
        let id = font.id();
        let idx = match self.entries.iter().position(|e| e.font == id && e.code == code) {
            Some(idx) => {
                self.stats.hits += 1;
                idx
            }
            None => {
                self.stats.misses += 1;
                let entry = CachedGlyph::rasterize(font, code, glyph);
                if self.entries.len() < self.capacity {
                    self.entries.push(entry);
                    self.entries.len() - 1
                } else {
                    // Full: replace the least recently used entry
                    let lru = self
                        .entries
                        .iter()
                        .enumerate()
                        .max_by_key(|(_, e)| self.tick.wrapping_sub(e.last_used))
                        .map_or(0, |(i, _)| i);
                    self.entries[lru] = entry;
                    self.stats.evictions += 1;
                    lru
                }
            }
        };
        let entry = &mut self.entries[idx];
        entry.last_used = self.tick;
        entry
    }

    /// Check for an entry without touching its age.
    pub fn contains(
        &self,
        font: &Font,
        code: u32,
    ) -> bool {
        let id = font.id();
        self.entries.iter().any(|e| e.font == id && e.code == code)
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[inline]
    pub const fn capacity(&self) -> usize { self.capacity }

    #[inline]
    pub const fn stats(&self) -> CacheStats { self.stats }

    /// Drop every entry, e.g. after fonts were unloaded.
    pub fn clear(&mut self) { self.entries.clear(); }
}

impl Default for GlyphCache {
    fn default() -> Self { Self::new(GLYPH_CACHE_SIZE) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tests::{AA_FONT, MONO};

    fn get(
        cache: &mut GlyphCache,
        font: &Font,
        ch: char,
    ) -> Vec<u8> {
        let (code, glyph) = font.glyph(ch).unwrap();
        cache.get_or_insert(font, code, glyph).alpha.clone()
    }

    #[test]
    fn test_rasterize_levels() {
        let mut cache = GlyphCache::new(4);
        assert_eq!(get(&mut cache, &AA_FONT, '?'), [0xFF, 0xAA, 0x55, 0x00]);
        assert_eq!(get(&mut cache, &MONO, 'A'), [0xFF; 8]);
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let mut cache = GlyphCache::new(4);
        get(&mut cache, &MONO, 'A');
        get(&mut cache, &MONO, 'A');
        get(&mut cache, &MONO, 'B');
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2, evictions: 0 });
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_bounded_lru_eviction() {
        let mut cache = GlyphCache::new(2);
        get(&mut cache, &MONO, 'A');
        get(&mut cache, &MONO, 'B');
        get(&mut cache, &MONO, 'A'); // B is now least recently used
        get(&mut cache, &MONO, 'C');
        assert_eq!(cache.len(), 2, "Cache never grows past capacity");
        assert!(cache.contains(&MONO, 'A' as u32));
        assert!(!cache.contains(&MONO, 'B' as u32));
        assert!(cache.contains(&MONO, 'C' as u32));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_fonts_keyed_separately() {
        let mut cache = GlyphCache::new(4);
        get(&mut cache, &MONO, '?');
        get(&mut cache, &AA_FONT, '?');
        assert_eq!(cache.len(), 2);
    }
}
