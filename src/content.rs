//! The guide itself: chapters, their optional parts, and the blocks each one renders.

use crate::registry::{Registry, RegistryError, Section};

pub const GUIDE_TITLE: &str = "Monorepo Setup Guide";

pub const FOOTER: &str = "Built with Next.js, Express, tRPC, and pnpm workspaces.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Warning,
    Success,
}

/// A unit of rendered content
#[derive(Debug)]
pub enum Block {
    /// Markdown paragraph(s)
    Prose(&'static str),
    /// Step heading inside a chapter
    Heading(&'static str),
    /// Small pill label above a code sample (e.g. the target platform)
    Tag(&'static str),
    Code {
        language: &'static str,
        code: &'static str,
    },
    Callout {
        kind: CalloutKind,
        title: &'static str,
        /// Markdown
        body: &'static str,
    },
    Bullets(&'static [&'static str]),
}

/// A nested part of a chapter, listed under it in the sidebar
#[derive(Debug)]
pub struct Part {
    pub id: &'static str,
    pub label: &'static str,
    pub title: &'static str,
    pub blocks: &'static [Block],
}

#[derive(Debug)]
pub struct Chapter {
    pub id: &'static str,
    /// Sidebar label
    pub label: &'static str,
    pub icon: &'static str,
    /// Heading shown in the document
    pub title: &'static str,
    pub blocks: &'static [Block],
    pub parts: &'static [Part],
}

/// Build the navigation registry from [`CHAPTERS`]
pub fn registry() -> Result<Registry, RegistryError> {
    let sections = CHAPTERS
        .iter()
        .map(|chapter| {
            chapter.parts.iter().fold(
                Section::new(chapter.id, chapter.label).with_icon(chapter.icon),
                |section, part| section.with_subsection(part.id, part.label),
            )
        })
        .collect();
    Registry::new(sections)
}

const BASH: &str = "bash";
const JSON: &str = "json";
const YAML: &str = "yaml";
const TS: &str = "typescript";

pub static CHAPTERS: &[Chapter] = &[
    Chapter {
        id: "intro",
        label: "Introduction",
        icon: "📖",
        title: "Next.js + Express + tRPC Monorepo",
        blocks: &[Block::Prose(
            "A complete, copy-paste setup guide for building a modern monorepo with \
             Next.js frontend, Express backend, and shared tRPC APIs using pnpm workspaces.",
        )],
        parts: &[],
    },
    Chapter {
        id: "structure",
        label: "Project Structure",
        icon: "📁",
        title: "Project Structure",
        blocks: &[
            Block::Prose("This is the directory structure we'll be creating:"),
            Block::Code {
                language: BASH,
                code: r#"my-monorepo/
├── apps/
│   ├── web/          # Next.js frontend
│   └── server/       # Express backend
├── packages/
│   └── api/          # Shared tRPC router definitions
├── package.json
├── turbo.json        # Optional
└── pnpm-workspace.yaml"#,
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "initialize",
        label: "Initialize Monorepo",
        icon: "⚙",
        title: "Initialize Monorepo",
        blocks: &[
            Block::Prose("Create the root project and workspace configuration:"),
            Block::Code {
                language: BASH,
                code: "mkdir my-monorepo && cd my-monorepo\npnpm init",
            },
            Block::Heading("Create Workspace Configuration"),
            Block::Prose("Create `pnpm-workspace.yaml`:"),
            Block::Code {
                language: YAML,
                code: "packages:\n  - 'apps/*'\n  - 'packages/*'",
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "api",
        label: "Shared API Package",
        icon: "⚡",
        title: "Setup Shared API Package",
        blocks: &[
            Block::Prose(
                "Create the shared tRPC API package that will be used by both frontend and backend:",
            ),
            Block::Code {
                language: BASH,
                code: r#"mkdir -p packages/api
cd packages/api
pnpm init
pnpm add @trpc/server zod
pnpm add -D typescript @types/express @types/node"#,
            },
            Block::Heading("TypeScript Configuration"),
            Block::Prose("Create `packages/api/tsconfig.json`:"),
            Block::Code {
                language: JSON,
                code: r#"{
  "compilerOptions": {
    "target": "ES2020",
    "module": "ESNext",
    "moduleResolution": "bundler",
    "strict": true,
    "esModuleInterop": true,
    "skipLibCheck": true,
    "declaration": true,
    "declarationMap": true,
    "outDir": "./dist"
  },
  "include": ["src"]
}"#,
            },
            Block::Heading("Define tRPC Router"),
            Block::Prose("Create `packages/api/src/index.ts`:"),
            Block::Code {
                language: TS,
                code: r#"import { initTRPC } from '@trpc/server';
import { z } from 'zod';

const t = initTRPC.create();

export const appRouter = t.router({
  greeting: t.procedure
    .input(z.object({ name: z.string() }))
    .query(({ input }) => {
      return { message: `Hello, ${input.name}!` };
    }),

  createUser: t.procedure
    .input(z.object({
      email: z.string().email(),
      name: z.string(),
    }))
    .mutation(({ input }) => {
      return { id: 1, ...input };
    }),
});

export type AppRouter = typeof appRouter;"#,
            },
            Block::Heading("Package Configuration"),
            Block::Prose("Update `packages/api/package.json`:"),
            Block::Code {
                language: JSON,
                code: r#"{
  "name": "@my-app/api",
  "version": "1.0.0",
  "main": "./dist/index.js",
  "types": "./dist/index.d.ts",
  "scripts": {
    "build": "tsc",
    "dev": "tsc --watch"
  }
}"#,
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "server",
        label: "Express Server",
        icon: "⚙",
        title: "Setup Express Server",
        blocks: &[
            Block::Prose("Create the Express backend that will serve the tRPC API:"),
            Block::Code {
                language: BASH,
                code: r#"cd ../../
mkdir -p apps/server
cd apps/server
pnpm init
pnpm add express @trpc/server cors
pnpm add -D typescript @types/node @types/express @types/cors tsx
pnpm add "@my-app/api@workspace:*""#,
            },
            Block::Callout {
                kind: CalloutKind::Warning,
                title: "⚠ Important",
                body: "Replace `@my-app/api` with the actual name from your \
                       `packages/api/package.json`. Always use quotes in zsh!",
            },
            Block::Heading("Server Entry Point"),
            Block::Prose("Create `apps/server/src/index.ts`:"),
            Block::Code {
                language: TS,
                code: r#"import express from 'express';
import cors from 'cors';
import { createExpressMiddleware } from '@trpc/server/adapters/express';
import { appRouter } from '@my-app/api';

const app = express();

app.use(cors());
app.use(express.json());

app.use(
  '/trpc',
  createExpressMiddleware({
    router: appRouter,
    createContext: () => ({}),
  })
);

const PORT = process.env.PORT || 4000;

app.listen(PORT, () => {
  console.log(`Server running on http://localhost:${PORT}`);
});"#,
            },
            Block::Heading("Package Scripts"),
            Block::Prose("Update `apps/server/package.json` scripts:"),
            Block::Code {
                language: JSON,
                code: r#"{
  "scripts": {
    "dev": "tsx watch src/index.ts",
    "build": "tsc",
    "start": "node dist/index.js"
  }
}"#,
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "client",
        label: "Next.js Client",
        icon: "🎨",
        title: "Setup Next.js Client",
        blocks: &[
            Block::Prose("Create the Next.js frontend with tRPC integration:"),
            Block::Code {
                language: BASH,
                code: r#"cd ../
pnpm dlx create-next-app@latest web --typescript --tailwind --app
cd web
pnpm add @trpc/client @trpc/react-query @tanstack/react-query
pnpm add "@my-app/api@workspace:*""#,
            },
            Block::Heading("tRPC Client Setup"),
            Block::Prose("Create `apps/web/src/utils/trpc.ts`:"),
            Block::Code {
                language: TS,
                code: r#"import { createTRPCReact } from '@trpc/react-query';
import type { AppRouter } from '@my-app/api';

export const trpc = createTRPCReact<AppRouter>();"#,
            },
            Block::Heading("Provider Setup"),
            Block::Prose("Create `apps/web/src/app/providers.tsx`:"),
            Block::Code {
                language: TS,
                code: r#"'use client';

import { QueryClient, QueryClientProvider } from '@tanstack/react-query';
import { httpBatchLink } from '@trpc/client';
import { useState } from 'react';
import { trpc } from '@/utils/trpc';

export function Providers({ children }: { children: React.ReactNode }) {
  const [queryClient] = useState(() => new QueryClient());
  const [trpcClient] = useState(() =>
    trpc.createClient({
      links: [
        httpBatchLink({
          url: 'http://localhost:4000/trpc',
        }),
      ],
    })
  );

  return (
    <trpc.Provider client={trpcClient} queryClient={queryClient}>
      <QueryClientProvider client={queryClient}>
        {children}
      </QueryClientProvider>
    </trpc.Provider>
  );
}"#,
            },
            Block::Heading("Root Layout"),
            Block::Prose("Update `apps/web/src/app/layout.tsx`:"),
            Block::Code {
                language: TS,
                code: r#"import { Providers } from './providers';

export default function RootLayout({
  children,
}: {
  children: React.ReactNode;
}) {
  return (
    <html lang="en">
      <body>
        <Providers>{children}</Providers>
      </body>
    </html>
  );
}"#,
            },
            Block::Heading("Demo Page"),
            Block::Prose("Create `apps/web/src/app/page.tsx`:"),
            Block::Code {
                language: TS,
                code: r#"'use client';

import { trpc } from '@/utils/trpc';

export default function Home() {
  const greeting = trpc.greeting.useQuery({ name: 'World' });
  const createUser = trpc.createUser.useMutation();

  return (
    <div className="p-8">
      <h1 className="text-2xl font-bold mb-4">tRPC Demo</h1>
      {greeting.data && <p className="mb-4">{greeting.data.message}</p>}

      <button
        className="bg-blue-600 text-white px-4 py-2 rounded-md hover:bg-blue-700 transition-colors"
        onClick={() => {
          createUser.mutate({
            email: 'test@example.com',
            name: 'John'
          });
        }}
      >
        Create User
      </button>
    </div>
  );
}"#,
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "config",
        label: "Root Configuration",
        icon: "⚡",
        title: "Root Configuration",
        blocks: &[
            Block::Prose("Add scripts to root `package.json`:"),
            Block::Code {
                language: JSON,
                code: r#"{
  "scripts": {
    "dev": "pnpm -r --parallel dev",
    "build": "pnpm -r build"
  }
}"#,
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "run",
        label: "Run Everything",
        icon: "🚀",
        title: "Run Everything",
        blocks: &[
            Block::Prose("Start all services with a single command:"),
            Block::Code {
                language: BASH,
                code: "cd ../../  # Back to root\npnpm dev",
            },
            Block::Callout {
                kind: CalloutKind::Success,
                title: "✔ Your apps should now be running:",
                body: "Express Server: `http://localhost:4000`\n\n\
                       Next.js App: `http://localhost:3000`",
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "tips",
        label: "Pro Tips",
        icon: "💡",
        title: "Pro Tips",
        blocks: &[
            Block::Heading("Check package name"),
            Block::Code {
                language: BASH,
                code: r#"cat packages/api/package.json | grep "name""#,
            },
            Block::Heading("Install dependencies for all workspaces"),
            Block::Code {
                language: BASH,
                code: "pnpm install",
            },
            Block::Heading("Add dependency to specific workspace"),
            Block::Code {
                language: BASH,
                code: "pnpm add <package> --filter <workspace-name>\n# Example: pnpm add lodash --filter web",
            },
            Block::Heading("Run command in specific workspace"),
            Block::Code {
                language: BASH,
                code: "pnpm --filter server dev\npnpm --filter web dev",
            },
            Block::Callout {
                kind: CalloutKind::Info,
                title: "💡 Remember",
                body: "Always use quotes when adding workspace dependencies in zsh: \
                       `\"<package>@workspace:*\"`",
            },
        ],
        parts: &[],
    },
    Chapter {
        id: "redis",
        label: "Redis Rate Limiting",
        icon: "🗄",
        title: "Redis Rate Limiting Setup",
        blocks: &[Block::Prose(
            "Complete guide to adding Redis-based rate limiting to your \
             Express + tRPC + Next.js monorepo.",
        )],
        parts: REDIS_PARTS,
    },
];

const REDIS_PARTS: &[Part] = &[
    Part {
        id: "redis-overview",
        label: "Overview",
        title: "Overview",
        blocks: &[
            Block::Prose(
                "This guide will help you add Redis-based rate limiting to protect your \
                 authentication endpoints (login, signup, password reset) from brute force \
                 attacks and abuse.",
            ),
            Block::Callout {
                kind: CalloutKind::Info,
                title: "What is Rate Limiting?",
                body: "Rate limiting controls how many requests a user can make in a time \
                       window. For example: \"5 login attempts per 15 minutes\". It prevents \
                       attackers from trying thousands of passwords.",
            },
            Block::Heading("✔ What You'll Build"),
            Block::Bullets(&[
                "Shared Redis package (`@repo/redis`)",
                "Rate limiting middleware for tRPC",
                "Protection for login, signup, and password reset endpoints",
                "Automatic blocking after too many failed attempts",
            ]),
        ],
    },
    Part {
        id: "redis-prerequisites",
        label: "Prerequisites",
        title: "Prerequisites",
        blocks: &[
            Block::Heading("Your existing monorepo structure:"),
            Block::Code {
                language: BASH,
                code: r#"root/
├── apps/
│   ├── web/          # Next.js frontend
│   └── server/       # Express backend
└── packages/
    └── api/          # tRPC routes & schemas"#,
            },
            Block::Callout {
                kind: CalloutKind::Warning,
                title: "Important",
                body: "Make sure you have your auth system (login, signup, etc.) already \
                       working before adding rate limiting.",
            },
        ],
    },
    Part {
        id: "redis-installation",
        label: "Installation",
        title: "Installation",
        blocks: &[
            Block::Heading("Step 1: Install Redis locally"),
            Block::Tag("macOS"),
            Block::Code {
                language: BASH,
                code: "# Using Homebrew\nbrew install redis\n\n# Start Redis server\nredis-server",
            },
            Block::Tag("Windows/Linux (Docker)"),
            Block::Code {
                language: BASH,
                code: "# Pull and run Redis container\n\
                       docker run -d -p 6379:6379 --name redis redis:alpine\n\n\
                       # Check if running\n\
                       docker ps",
            },
            Block::Tag("Verify Connection"),
            Block::Code {
                language: BASH,
                code: "# Test connection\nredis-cli ping\n# Should respond: PONG",
            },
            Block::Callout {
                kind: CalloutKind::Success,
                title: "For Production",
                body: "Use cloud Redis services like **Upstash** (free tier: 10k requests/day) \
                       or **Redis Cloud** (30MB free). Just change the connection URL in your \
                       environment variables.",
            },
        ],
    },
    Part {
        id: "redis-create-package",
        label: "Create Redis Package",
        title: "Create Redis Package",
        blocks: &[
            Block::Heading("Step 1: Create package folder"),
            Block::Code {
                language: BASH,
                code: "# Create new package folder\nmkdir -p packages/redis/src\n\n\
                       # Navigate to it\ncd packages/redis",
            },
            Block::Heading("Step 2: Initialize package.json"),
            Block::Code {
                language: JSON,
                code: r#"{
  "name": "@repo/redis",
  "version": "1.0.0",
  "main": "./src/index.ts",
  "types": "./src/index.ts",
  "scripts": {
    "dev": "tsc --watch"
  }
}"#,
            },
            Block::Heading("Step 3: Install dependencies"),
            Block::Code {
                language: BASH,
                code: r#"# Install ioredis (Redis client)
pnpm add ioredis --filter "@repo/redis"

# Install types
pnpm add -D @types/node typescript --filter "@repo/redis""#,
            },
            Block::Callout {
                kind: CalloutKind::Info,
                title: "Why ioredis?",
                body: "ioredis is the most popular Redis client for Node.js with excellent \
                       TypeScript support. It's faster and more feature-rich than the official \
                       redis client.",
            },
            Block::Heading("Step 4: Create Redis client (packages/redis/src/client.ts)"),
            Block::Code {
                language: TS,
                code: r#"import Redis from "ioredis";

// Store Redis connection globally (singleton pattern)
let redisConnection: Redis | null = null;

/**
 * Get or create Redis connection
 * Reuses the same connection across your app
 */
export function getRedisClient(): Redis {
  if (redisConnection) {
    return redisConnection;
  }

  // Create new connection
  redisConnection = new Redis({
    host: process.env.REDIS_HOST || "localhost",
    port: parseInt(process.env.REDIS_PORT || "6379"),
    password: process.env.REDIS_PASSWORD,

    // Retry connection if it fails
    retryStrategy: (times) => {
      const delay = Math.min(times * 50, 2000);
      return delay;
    },

    lazyConnect: true, // Don't connect until we call .connect()
  });

  // Log errors
  redisConnection.on("error", (err) => {
    console.error("Redis Error:", err);
  });

  // Log successful connection
  redisConnection.on("connect", () => {
    console.log("Redis connected");
  });

  return redisConnection;
}

// Connect to Redis when server starts
export async function connectRedis(): Promise<void> {
  const client = getRedisClient();
  if (client.status !== "ready") {
    await client.connect();
  }
}

// Disconnect when server shuts down
export async function disconnectRedis(): Promise<void> {
  if (redisConnection) {
    await redisConnection.quit();
    redisConnection = null;
  }
}"#,
            },
            Block::Heading("Step 5: Create rate limiter (packages/redis/src/services/rateLimiter.ts)"),
            Block::Code {
                language: TS,
                code: r#"import { Redis } from "ioredis";
import { getRedisClient } from "../client";

export interface RateLimitResult {
  allowed: boolean;    // Can user proceed?
  remaining: number;   // Attempts left
  resetAt: Date;       // When limit resets
  limit: number;       // Max attempts allowed
}

export interface RateLimitConfig {
  maxAttempts: number;           // e.g., 5 attempts
  windowSeconds: number;         // e.g., 900 (15 minutes)
  blockDurationSeconds?: number; // Block duration after exceeding
}

/**
 * FIXED WINDOW RATE LIMITER
 * Simple counter that resets after time window
 */
export async function checkFixedWindowRateLimit(
  identifier: string,
  config: RateLimitConfig
): Promise<RateLimitResult> {
  const redis = getRedisClient();
  const { maxAttempts, windowSeconds } = config;
  const key = `rate:${identifier}`;
  const now = Date.now();

  // INCR: Increment counter by 1
  // TTL: Get time until key expires
  const pipeline = redis.multi();
  pipeline.incr(key);
  pipeline.ttl(key);
  const results = await pipeline.exec();

  if (!results) throw new Error("Redis failed");

  const count = results[0][1] as number;
  const ttl = results[1][1] as number;

  // Set expiry on first request
  if (ttl === -1) {
    await redis.expire(key, windowSeconds);
  }

  const allowed = count <= maxAttempts;
  const remaining = Math.max(0, maxAttempts - count);
  const resetAt = new Date(
    now + (ttl > 0 ? ttl * 1000 : windowSeconds * 1000)
  );

  return { allowed, remaining, resetAt, limit: maxAttempts };
}

/**
 * BLOCK an identifier after too many attempts
 */
export async function blockIdentifier(
  identifier: string,
  durationSeconds: number
): Promise<void> {
  const redis = getRedisClient();
  const key = `block:${identifier}`;
  await redis.setex(key, durationSeconds, "1");
}

/**
 * CHECK if identifier is blocked
 */
export async function isIdentifierBlocked(
  identifier: string
): Promise<boolean> {
  const redis = getRedisClient();
  const key = `block:${identifier}`;
  const blocked = await redis.get(key);
  return blocked !== null;
}

/**
 * GET remaining block time
 */
export async function getBlockTimeRemaining(
  identifier: string
): Promise<number> {
  const redis = getRedisClient();
  const key = `block:${identifier}`;
  const ttl = await redis.ttl(key);
  return ttl > 0 ? ttl : 0;
}"#,
            },
            Block::Heading("Step 6: Export everything (packages/redis/src/index.ts)"),
            Block::Code {
                language: TS,
                code: r#"export { getRedisClient, connectRedis, disconnectRedis } from "./client";
export {
  checkFixedWindowRateLimit,
  blockIdentifier,
  isIdentifierBlocked,
  getBlockTimeRemaining,
} from "./services/rateLimiter";
export type { RateLimitResult, RateLimitConfig } from "./services/rateLimiter";"#,
            },
        ],
    },
    Part {
        id: "redis-implementation",
        label: "Implementation",
        title: "Implementation",
        blocks: &[
            Block::Heading(
                "Step 1: Create rate limit middleware (packages/api/src/middleware/rateLimit.ts)",
            ),
            Block::Code {
                language: TS,
                code: r#"import { TRPCError } from "@trpc/server";
import {
  checkFixedWindowRateLimit,
  isIdentifierBlocked,
  getBlockTimeRemaining,
  blockIdentifier,
  RateLimitConfig,
} from "@repo/redis";
import { Context } from "../context";

export interface RateLimitMiddlewareConfig extends RateLimitConfig {
  keyPrefix: string;    // e.g., "login", "signup"
  useEmail?: boolean;   // Rate limit by email (true) or IP (false)
}

/**
 * Check rate limit before processing request
 */
export async function checkRateLimit(
  ctx: Context,
  config: RateLimitMiddlewareConfig,
  email?: string
): Promise<void> {
  // Create unique identifier
  let identifier: string;

  if (config.useEmail && email) {
    identifier = `${config.keyPrefix}:email:${email}`;
  } else {
    const ip = ctx.req.ip || ctx.req.socket.remoteAddress || "unknown";
    identifier = `${config.keyPrefix}:ip:${ip}`;
  }

  // Check if blocked
  const blocked = await isIdentifierBlocked(identifier);
  if (blocked) {
    const remaining = await getBlockTimeRemaining(identifier);
    const minutes = Math.ceil(remaining / 60);
    throw new TRPCError({
      code: "TOO_MANY_REQUESTS",
      message: `Too many attempts. Try again in ${minutes} minute${minutes > 1 ? 's' : ''}.`,
    });
  }

  // Check rate limit
  const result = await checkFixedWindowRateLimit(identifier, config);

  // Add headers
  ctx.res.setHeader("X-RateLimit-Limit", result.limit.toString());
  ctx.res.setHeader("X-RateLimit-Remaining", result.remaining.toString());
  ctx.res.setHeader("X-RateLimit-Reset", result.resetAt.toISOString());

  // Block if exceeded
  if (!result.allowed) {
    if (config.blockDurationSeconds) {
      await blockIdentifier(identifier, config.blockDurationSeconds);
    }
    throw new TRPCError({
      code: "TOO_MANY_REQUESTS",
      message: "Too many attempts. Please try again later.",
    });
  }
}"#,
            },
            Block::Heading("Step 2: Add to your login service"),
            Block::Code {
                language: TS,
                code: r#"// packages/api/src/services/auth/signin.service.ts
import { checkRateLimit } from "../../middleware/rateLimit";

export async function signInUser(input: SigninInput, ctx: Context) {
  // Validate input first
  const validateFields = signinSchema.safeParse(input);
  if (!validateFields.success) {
    // Return validation errors
  }

  const { email, password } = validateFields.data;

  // CHECK RATE LIMIT BEFORE LOGIN ATTEMPT
  try {
    await checkRateLimit(
      ctx,
      {
        keyPrefix: "login",          // Namespace
        maxAttempts: 5,              // 5 attempts
        windowSeconds: 900,          // per 15 minutes
        blockDurationSeconds: 1800,  // block 30 min after
        useEmail: true,              // Rate limit by email
      },
      email
    );
  } catch (error) {
    // Return rate limit error
    if (error instanceof Error) {
      return {
        success: false,
        message: error.message,
        inputs: { ...input },
      };
    }
    throw error;
  }

  // Proceed with login...
  // Your existing auth logic here
}"#,
            },
            Block::Heading("Step 3: Connect Redis in server startup (apps/server/src/index.ts)"),
            Block::Code {
                language: TS,
                code: r#"import { connectRedis, disconnectRedis } from "@repo/redis";

async function startServer() {
  // Connect to Redis before starting server
  console.log("Connecting to Redis...");
  await connectRedis();

  // ... your server setup

  app.listen(PORT, () => {
    console.log(`Server on port ${PORT}`);
  });
}

// Graceful shutdown
process.on("SIGINT", async () => {
  await disconnectRedis();
  process.exit(0);
});

startServer();"#,
            },
            Block::Heading("Step 4: Add environment variables (apps/server/.env)"),
            Block::Code {
                language: BASH,
                code: "# Redis Configuration\nREDIS_HOST=localhost\nREDIS_PORT=6379\n\
                       # REDIS_PASSWORD=your_password_if_needed",
            },
        ],
    },
    Part {
        id: "redis-usage",
        label: "Usage Examples",
        title: "Usage Examples",
        blocks: &[
            Block::Heading("Login (Strict limits)"),
            Block::Code {
                language: TS,
                code: r#"await checkRateLimit(ctx, {
  keyPrefix: "login",
  maxAttempts: 5,      // 5 attempts
  windowSeconds: 900,  // per 15 minutes
  blockDurationSeconds: 1800, // block 30 min
  useEmail: true,
}, email);"#,
            },
            Block::Heading("Forgot Password (Prevent spam)"),
            Block::Code {
                language: TS,
                code: r#"await checkRateLimit(ctx, {
  keyPrefix: "forgot-password",
  maxAttempts: 3,      // 3 attempts
  windowSeconds: 3600, // per 1 hour
  blockDurationSeconds: 7200, // block 2 hours
  useEmail: true,
}, email);"#,
            },
            Block::Heading("Signup (Prevent bot accounts)"),
            Block::Code {
                language: TS,
                code: r#"await checkRateLimit(ctx, {
  keyPrefix: "signup",
  maxAttempts: 3,      // 3 signups
  windowSeconds: 3600, // per hour
  useEmail: false,     // Rate limit by IP
});"#,
            },
            Block::Heading("Email Verification (Prevent code guessing)"),
            Block::Code {
                language: TS,
                code: r#"await checkRateLimit(ctx, {
  keyPrefix: "verify-email",
  maxAttempts: 5,     // 5 attempts
  windowSeconds: 600, // per 10 minutes
  useEmail: true,
}, email);"#,
            },
        ],
    },
    Part {
        id: "redis-testing",
        label: "Testing Rate Limits",
        title: "Testing Rate Limits",
        blocks: &[
            Block::Heading("Test in Redis CLI"),
            Block::Code {
                language: BASH,
                code: r#"# Open Redis CLI
redis-cli

# Check if rate limit key exists
GET rate:login:email:user@example.com

# See all rate limit keys
KEYS rate:*

# Check TTL (time until reset)
TTL rate:login:email:user@example.com

# Manually clear rate limit
DEL rate:login:email:user@example.com"#,
            },
            Block::Heading("Test with curl"),
            Block::Code {
                language: BASH,
                code: r#"# Try login 6 times to trigger rate limit
for i in {1..6}; do
  echo "Attempt $i"
  curl -X POST http://localhost:3000/api/trpc/signin \
    -H "Content-Type: application/json" \
    -d '{"email":"test@example.com","password":"wrong"}'
  echo "\n"
done"#,
            },
            Block::Callout {
                kind: CalloutKind::Success,
                title: "✔ Expected Behavior",
                body: "After 5 attempts, you should see a `TOO_MANY_REQUESTS` error. Check \
                       response headers for `X-RateLimit-Remaining` to see attempts left.",
            },
        ],
    },
    Part {
        id: "redis-tips",
        label: "Pro Tips",
        title: "💡 Pro Tips",
        blocks: &[
            Block::Heading("Monitor Redis in real-time"),
            Block::Code {
                language: BASH,
                code: "# Watch Redis commands as they execute\nredis-cli monitor",
            },
            Block::Heading("Check Redis memory usage"),
            Block::Code {
                language: BASH,
                code: "redis-cli INFO memory",
            },
            Block::Heading("Flush all rate limits (development only!)"),
            Block::Code {
                language: BASH,
                code: r#"# Delete all keys matching pattern
redis-cli KEYS "rate:*" | xargs redis-cli DEL

# Or flush entire database (CAREFUL!)
redis-cli FLUSHDB"#,
            },
            Block::Heading("Add Redis package to other workspaces"),
            Block::Code {
                language: BASH,
                code: r#"# Add to API package
pnpm add "@repo/redis@workspace:*" --filter "@repo/api""#,
            },
            Block::Callout {
                kind: CalloutKind::Info,
                title: "🚀 Production Tips",
                body: "- Use **Upstash** for serverless Redis (auto-scales)\n\
                       - Set `REDIS_PASSWORD` in production\n\
                       - Monitor rate limit hits with logging\n\
                       - Adjust limits based on real traffic patterns",
            },
            Block::Callout {
                kind: CalloutKind::Warning,
                title: "⚠ Common Mistakes",
                body: "- **Don't rate limit GET requests** (only mutations)\n\
                       - **Don't make limits too strict** (frustrates users)\n\
                       - **Always use try-catch** (handle Redis failures gracefully)\n\
                       - **Test rate limits thoroughly** before deploying",
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_registry_is_valid() {
        let registry = registry().expect("guide ids are unique");
        assert_eq!(registry.first_id(), "intro");
        assert_eq!(registry.sections().len(), CHAPTERS.len());

        let redis = registry.sections().last().expect("registry is not empty");
        assert_eq!(redis.id, "redis");
        assert!(redis.owns("redis-overview"));
        assert_eq!(redis.subsections.len(), REDIS_PARTS.len());
        assert_eq!(redis.subsections.last().map(|s| s.id.as_str()), Some("redis-tips"));
    }

    #[test]
    fn test_every_chapter_has_content() {
        for chapter in CHAPTERS {
            assert!(!chapter.blocks.is_empty(), "{} is empty", chapter.id);
            for part in chapter.parts {
                assert!(!part.blocks.is_empty(), "{} is empty", part.id);
            }
        }
    }
}
